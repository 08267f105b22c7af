//! In-memory document store that enforces the rules on every access.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::audit::{AuditEvent, AuditEventKind, AuditOutcome, AuditTrail};
use crate::document::{owner_of, Document, DocumentPath, Fields};
use crate::error::{Result, StoreError};
use crate::logging::RequestLog;
use crate::policy::{Decision, DenyReason};
use crate::request::RequestMeta;
use crate::rules::{CollectionRule, Rules};

/// Document store guarded by [`Rules`].
///
/// Reads are checked against the stored owner. Creates are checked against
/// the owner carried by the new document, so a caller can only create
/// documents it owns. Updates and deletes are checked against the stored
/// owner, and the owner field can never be changed once set.
///
/// # Examples
///
/// ```
/// use billwise_rules::{DocumentStore, RequestMeta, Rules, StoreError};
/// use serde_json::json;
///
/// let store = DocumentStore::new(Rules::default());
/// let alice = RequestMeta::authenticated("req-1", "alice");
/// let bob = RequestMeta::authenticated("req-2", "bob");
/// let path = "Bills/testBill".parse().unwrap();
///
/// let fields = json!({ "user_id": "alice", "title": "My Bill" });
/// store.set(&alice, &path, fields.as_object().unwrap().clone()).unwrap();
///
/// assert!(store.get(&alice, &path).is_ok());
/// assert!(matches!(store.get(&bob, &path), Err(StoreError::PermissionDenied { .. })));
/// ```
#[derive(Debug)]
pub struct DocumentStore {
    rules: Rules,
    documents: RwLock<HashMap<DocumentPath, Fields>>,
    audit: AuditTrail,
}

impl DocumentStore {
    /// Creates an empty store enforcing `rules`.
    pub fn new(rules: Rules) -> Self {
        Self {
            rules,
            documents: RwLock::new(HashMap::new()),
            audit: AuditTrail::new(),
        }
    }

    /// Returns the rules this store enforces.
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Returns the audit trail of every attempted operation.
    pub fn audit(&self) -> &AuditTrail {
        &self.audit
    }

    /// Fetches a document.
    ///
    /// A missing document has no owner, so reading it is denied exactly like
    /// reading someone else's document.
    ///
    /// # Errors
    ///
    /// - `PermissionDenied` if the caller does not own a document at `path`
    ///   or the collection has no rule
    pub fn get(&self, meta: &RequestMeta, path: &DocumentPath) -> Result<Document> {
        let kind = AuditEventKind::Get;
        let log = RequestLog::new(meta);
        let rule = self.rule_for(meta, kind, path, &log)?;

        let documents = self.read();
        let fields = documents.get(path);
        let owner = fields
            .and_then(|f| owner_of(f, &rule.owner_field))
            .unwrap_or_default();
        self.enforce(meta, kind, path, owner, &log)?;

        // Stored owners are never empty, so a permitted read always has a document.
        let Some(fields) = fields else {
            return Err(self.deny(meta, kind, path, DenyReason::NotOwner, &log));
        };

        self.record(meta, kind, path, AuditOutcome::Permitted);
        Ok(Document::new(path.clone(), fields.clone()))
    }

    /// Creates or fully replaces a document.
    ///
    /// # Errors
    ///
    /// - `PermissionDenied` if the caller does not own the existing document,
    ///   is not the owner named by a new document, or the collection has no rule
    /// - `MissingOwner` if a permitted update drops the owner field
    /// - `OwnerImmutable` if a permitted update changes the owner
    pub fn set(&self, meta: &RequestMeta, path: &DocumentPath, fields: Fields) -> Result<()> {
        let kind = AuditEventKind::Set;
        let log = RequestLog::new(meta);
        let rule = self.rule_for(meta, kind, path, &log)?;

        let mut documents = self.write();
        let current = documents
            .get(path)
            .map(|existing| owner_of(existing, &rule.owner_field).unwrap_or_default().to_string());
        let requested = owner_of(&fields, &rule.owner_field);

        let checked_owner = current.as_deref().or(requested).unwrap_or_default();
        self.enforce(meta, kind, path, checked_owner, &log)?;

        let requested = match requested {
            Some(owner) => owner,
            None => {
                self.record(meta, kind, path, AuditOutcome::Error);
                return Err(StoreError::MissingOwner {
                    path: path.to_string(),
                    field: rule.owner_field.clone(),
                });
            }
        };

        if let Some(current) = current {
            if current != requested {
                log.warn(format_args!("owner change on {} rejected", path));
                self.record(meta, kind, path, AuditOutcome::Error);
                return Err(StoreError::OwnerImmutable {
                    path: path.to_string(),
                    current,
                    requested: requested.to_string(),
                });
            }
        }

        documents.insert(path.clone(), fields);
        self.record(meta, kind, path, AuditOutcome::Permitted);
        Ok(())
    }

    /// Deletes a document.
    ///
    /// Deleting a missing document is denied, as for [`DocumentStore::get`].
    ///
    /// # Errors
    ///
    /// - `PermissionDenied` if the caller does not own a document at `path`
    ///   or the collection has no rule
    pub fn delete(&self, meta: &RequestMeta, path: &DocumentPath) -> Result<()> {
        let kind = AuditEventKind::Delete;
        let log = RequestLog::new(meta);
        let rule = self.rule_for(meta, kind, path, &log)?;

        let mut documents = self.write();
        let owner = documents
            .get(path)
            .and_then(|f| owner_of(f, &rule.owner_field))
            .unwrap_or_default()
            .to_string();
        self.enforce(meta, kind, path, &owner, &log)?;

        if documents.remove(path).is_none() {
            return Err(self.deny(meta, kind, path, DenyReason::NotOwner, &log));
        }
        self.record(meta, kind, path, AuditOutcome::Permitted);
        Ok(())
    }

    /// Returns the number of stored documents.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Removes all documents and audit events, bypassing the rules.
    pub fn clear(&self) {
        self.write().clear();
        self.audit.clear();
    }

    /// Looks up the collection's rule, denying the request if there is none.
    fn rule_for(
        &self,
        meta: &RequestMeta,
        kind: AuditEventKind,
        path: &DocumentPath,
        log: &RequestLog<'_>,
    ) -> Result<&CollectionRule> {
        self.rules
            .rule_for(path.collection())
            .ok_or_else(|| self.deny(meta, kind, path, DenyReason::NoMatchingRule, log))
    }

    /// Checks the rules against `owner`. Only denials are recorded here.
    fn enforce(
        &self,
        meta: &RequestMeta,
        kind: AuditEventKind,
        path: &DocumentPath,
        owner: &str,
        log: &RequestLog<'_>,
    ) -> Result<()> {
        let decision = self.rules.check(
            meta.authenticated_principal(),
            path.collection(),
            owner,
            kind.operation(),
        );

        match decision {
            Decision::Permitted => {
                log.decision(kind.operation(), path, decision);
                Ok(())
            }
            Decision::Denied(reason) => Err(self.deny(meta, kind, path, reason, log)),
        }
    }

    fn deny(
        &self,
        meta: &RequestMeta,
        kind: AuditEventKind,
        path: &DocumentPath,
        reason: DenyReason,
        log: &RequestLog<'_>,
    ) -> StoreError {
        log.decision(kind.operation(), path, Decision::Denied(reason));
        self.record(meta, kind, path, AuditOutcome::Denied(reason));
        StoreError::PermissionDenied {
            operation: kind.operation(),
            path: path.to_string(),
            reason,
        }
    }

    fn record(
        &self,
        meta: &RequestMeta,
        kind: AuditEventKind,
        path: &DocumentPath,
        outcome: AuditOutcome,
    ) {
        self.audit.record(AuditEvent::new(
            meta.request_id.as_str(),
            meta.authenticated_principal().map(|p| p.id.as_str()),
            kind,
            path.to_string(),
            outcome,
        ));
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<DocumentPath, Fields>> {
        self.documents.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<DocumentPath, Fields>> {
        self.documents.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}
