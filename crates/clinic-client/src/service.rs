//! Resource services: a route table per entity plus a typed dispatcher.
//!
//! A [`ServiceDescriptor`] maps each logical [`Operation`] to an HTTP method
//! and a path template. Templates may contain [`ID_PLACEHOLDER`], which is
//! substituted textually before dispatch; an empty identifier is rejected
//! instead of producing a malformed path. Pagination and search text always
//! travel as query parameters.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use clinic_core::{CoreError, Pagination, Resource, ResourceKind};
use indexmap::IndexMap;
use reqwest::Method;

use crate::envelope::ApiReply;
use crate::error::{ClientError, Result};
use crate::http::ApiClient;

pub const ID_PLACEHOLDER: &str = "{id}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Update,
    Enable,
    Disable,
    Delete,
    GetAll,
    GetActive,
    Search,
    GetById,
    Count,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Enable => "enable",
            Self::Disable => "disable",
            Self::Delete => "delete",
            Self::GetAll => "getAll",
            Self::GetActive => "getActive",
            Self::Search => "search",
            Self::GetById => "getById",
            Self::Count => "count",
        }
    }

    pub fn is_paginated(&self) -> bool {
        matches!(self, Self::GetAll | Self::GetActive | Self::Search)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: Method,
    pub template: String,
}

impl Route {
    pub fn new(method: Method, template: impl Into<String>) -> Self {
        Self {
            method,
            template: template.into(),
        }
    }

    pub fn needs_id(&self) -> bool {
        self.template.contains(ID_PLACEHOLDER)
    }

    /// Substitute the identifier into the template. Returns `None` when the
    /// template needs an identifier and `id` is missing or blank.
    pub fn resolve(&self, id: Option<&str>) -> Option<String> {
        if !self.needs_id() {
            return Some(self.template.clone());
        }
        let id = id.map(str::trim).filter(|id| !id.is_empty())?;
        Some(self.template.replace(ID_PLACEHOLDER, id))
    }
}

/// The address book for one entity.
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    kind: ResourceKind,
    routes: IndexMap<Operation, Route>,
    search_param: String,
}

impl ServiceDescriptor {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            routes: IndexMap::new(),
            search_param: "query".to_string(),
        }
    }

    /// Conventional REST layout under the entity's collection path.
    pub fn standard(kind: ResourceKind) -> Self {
        let base = format!("/{}", kind.collection());
        let item = format!("{base}/{ID_PLACEHOLDER}");
        Self::new(kind)
            .route(Operation::Create, Method::POST, base.clone())
            .route(Operation::Update, Method::PUT, item.clone())
            .route(Operation::Enable, Method::PATCH, format!("{item}/enable"))
            .route(Operation::Disable, Method::PATCH, format!("{item}/disable"))
            .route(Operation::Delete, Method::DELETE, item.clone())
            .route(Operation::GetAll, Method::GET, base.clone())
            .route(Operation::GetActive, Method::GET, format!("{base}/active"))
            .route(Operation::Search, Method::GET, format!("{base}/search"))
            .route(Operation::GetById, Method::GET, item)
            .route(Operation::Count, Method::GET, format!("{base}/count"))
    }

    pub fn route(mut self, op: Operation, method: Method, template: impl Into<String>) -> Self {
        self.routes.insert(op, Route::new(method, template));
        self
    }

    pub fn without(mut self, op: Operation) -> Self {
        self.routes.shift_remove(&op);
        self
    }

    pub fn search_param(mut self, name: impl Into<String>) -> Self {
        self.search_param = name.into();
        self
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn search_param_name(&self) -> &str {
        &self.search_param
    }

    pub fn supports(&self, op: Operation) -> bool {
        self.routes.contains_key(&op)
    }

    pub fn routes(&self) -> impl Iterator<Item = (&Operation, &Route)> {
        self.routes.iter()
    }

    /// Method and concrete path for `op`.
    pub fn resolve(&self, op: Operation, id: Option<&str>) -> Result<(Method, String)> {
        let route = self
            .routes
            .get(&op)
            .ok_or_else(|| CoreError::missing_route(self.kind.collection(), op.as_str()))?;
        let path = route
            .resolve(id)
            .ok_or_else(|| CoreError::empty_identifier(self.kind.collection(), op.as_str()))?;
        Ok((route.method.clone(), path))
    }
}

/// Typed dispatcher for one entity. Performs no validation and no response
/// transformation beyond decoding.
pub struct ResourceService<R> {
    client: Arc<ApiClient>,
    descriptor: Arc<ServiceDescriptor>,
    _marker: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            descriptor: Arc::clone(&self.descriptor),
            _marker: PhantomData,
        }
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(client: Arc<ApiClient>, descriptor: ServiceDescriptor) -> Self {
        debug_assert_eq!(descriptor.kind(), R::KIND);
        Self {
            client,
            descriptor: Arc::new(descriptor),
            _marker: PhantomData,
        }
    }

    pub fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    pub fn supports(&self, op: Operation) -> bool {
        self.descriptor.supports(op)
    }

    async fn dispatch(
        &self,
        op: Operation,
        id: Option<&str>,
        query: &[(&str, String)],
        body: Option<&R>,
    ) -> Result<ApiReply> {
        let (method, path) = self.descriptor.resolve(op, id)?;
        let body = body.map(serde_json::to_value).transpose()?;
        self.client.send(method, &path, query, body.as_ref()).await
    }

    pub async fn create(&self, input: &R) -> Result<ApiReply> {
        self.dispatch(Operation::Create, None, &[], Some(input)).await
    }

    pub async fn update(&self, id: &str, input: &R) -> Result<ApiReply> {
        self.dispatch(Operation::Update, Some(id), &[], Some(input))
            .await
    }

    pub async fn enable(&self, id: &str) -> Result<ApiReply> {
        self.dispatch(Operation::Enable, Some(id), &[], None).await
    }

    pub async fn disable(&self, id: &str) -> Result<ApiReply> {
        self.dispatch(Operation::Disable, Some(id), &[], None).await
    }

    pub async fn delete(&self, id: &str) -> Result<ApiReply> {
        self.dispatch(Operation::Delete, Some(id), &[], None).await
    }

    pub async fn get_all(&self, page: &Pagination) -> Result<ApiReply> {
        self.dispatch(Operation::GetAll, None, &page.query_params(), None)
            .await
    }

    pub async fn get_active(&self, page: &Pagination) -> Result<ApiReply> {
        self.dispatch(Operation::GetActive, None, &page.query_params(), None)
            .await
    }

    pub async fn search_by_name(&self, text: &str, page: &Pagination) -> Result<ApiReply> {
        let [page_param, size_param] = page.query_params();
        let query = [
            (self.descriptor.search_param_name(), text.to_string()),
            page_param,
            size_param,
        ];
        self.dispatch(Operation::Search, None, &query, None).await
    }

    /// Point lookup returning the decoded record.
    pub async fn get_by_id(&self, id: &str) -> Result<R> {
        let reply = self.dispatch(Operation::GetById, Some(id), &[], None).await?;
        reply
            .data::<R>()?
            .ok_or_else(|| ClientError::missing_data(format!("{}/{id}", R::KIND.collection())))
    }

    pub async fn count(&self) -> Result<ApiReply> {
        self.dispatch(Operation::Count, None, &[], None).await
    }
}
