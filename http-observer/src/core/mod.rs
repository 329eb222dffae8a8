//! Core abstractions for the HTTP observer
//!
//! - `HttpExecutor`: the request surface of an observed client, as a trait
//! - `HttpClientBuilder`: builder pattern for creating clients

pub mod builder;
pub use builder::HttpClientBuilder;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::HttpClient;
use crate::error::Result;
use crate::transport::{RequestOptions, Transport};

/// Trait responsible for executing HTTP requests with strong typing
#[async_trait]
pub trait HttpExecutor: Send + Sync {
    /// Execute a GET request
    async fn get<R>(&self, url: &str, options: Option<RequestOptions>) -> Result<R>
    where
        R: DeserializeOwned + Send;

    /// Execute a POST request
    async fn post<R>(&self, url: &str, body: Option<Value>, options: Option<RequestOptions>) -> Result<R>
    where
        R: DeserializeOwned + Send;

    /// Execute a PUT request
    async fn put<R>(&self, url: &str, body: Option<Value>, options: Option<RequestOptions>) -> Result<R>
    where
        R: DeserializeOwned + Send;

    /// Execute a DELETE request
    async fn delete<R>(&self, url: &str, options: Option<RequestOptions>) -> Result<R>
    where
        R: DeserializeOwned + Send;
}

#[async_trait]
impl<T: Transport + 'static> HttpExecutor for HttpClient<T> {
    async fn get<R>(&self, url: &str, options: Option<RequestOptions>) -> Result<R>
    where
        R: DeserializeOwned + Send,
    {
        HttpClient::get(self, url, options).await
    }

    async fn post<R>(&self, url: &str, body: Option<Value>, options: Option<RequestOptions>) -> Result<R>
    where
        R: DeserializeOwned + Send,
    {
        HttpClient::post(self, url, body, options).await
    }

    async fn put<R>(&self, url: &str, body: Option<Value>, options: Option<RequestOptions>) -> Result<R>
    where
        R: DeserializeOwned + Send,
    {
        HttpClient::put(self, url, body, options).await
    }

    async fn delete<R>(&self, url: &str, options: Option<RequestOptions>) -> Result<R>
    where
        R: DeserializeOwned + Send,
    {
        HttpClient::delete(self, url, options).await
    }
}
