use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::{ApiError, RegistrationApi};
use crate::models::{Registration, RegistrationId};

/// HTTP implementation of [`RegistrationApi`] using reqwest's blocking client
/// Runs on the worker thread, so blocking calls never stall the UI.
pub struct HttpApi {
    client: Client,
    base: Url,
}

impl HttpApi {
    /// Create a client for the collection at `base_url`
    /// (e.g. `http://localhost:3000/registrations`)
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base =
            Url::parse(base_url).map_err(|_| ApiError::InvalidUrl(base_url.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        // Requests are never timed out or cancelled
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| ApiError::transport(base_url, e))?;

        log::debug!("HttpApi initialized for {}", base);
        Ok(HttpApi { client, base })
    }

    /// URL of the collection resource
    pub fn collection_url(&self) -> Url {
        self.base.clone()
    }

    /// URL of one resource: the collection URL plus the id as a path segment
    pub fn item_url(&self, id: &RegistrationId) -> Url {
        let mut url = self.base.clone();
        // cannot_be_a_base() was rejected in new()
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&id.to_string());
        }
        url
    }

    /// Send a request and reject non-success statuses
    fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response, ApiError> {
        let response = request
            .send()
            .map_err(|e| ApiError::transport(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    /// Read the whole body and parse it as JSON
    fn decode<T: DeserializeOwned>(response: Response, url: &Url) -> Result<T, ApiError> {
        let body = response
            .text()
            .map_err(|e| ApiError::transport(url.as_str(), e))?;

        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

impl RegistrationApi for HttpApi {
    fn list_all(&self) -> Result<Vec<Registration>, ApiError> {
        let url = self.collection_url();
        let response = self.send(self.client.get(url.clone()), &url)?;
        let records: Vec<Registration> = Self::decode(response, &url)?;
        log::debug!("GET {} returned {} registrations", url, records.len());
        Ok(records)
    }

    fn get_one(&self, id: &RegistrationId) -> Result<Registration, ApiError> {
        let url = self.item_url(id);
        let response = self.send(self.client.get(url.clone()), &url)?;
        Self::decode(response, &url)
    }

    fn create(&self, record: &Registration) -> Result<(), ApiError> {
        let url = self.collection_url();
        let request = self.client.post(url.clone()).json(&record.without_id());
        self.send(request, &url)?;
        log::debug!("POST {} accepted", url);
        Ok(())
    }

    fn update(&self, id: &RegistrationId, record: &Registration) -> Result<(), ApiError> {
        let url = self.item_url(id);
        let request = self.client.put(url.clone()).json(&record.without_id());
        self.send(request, &url)?;
        log::debug!("PUT {} accepted", url);
        Ok(())
    }

    fn delete(&self, id: &RegistrationId) -> Result<(), ApiError> {
        let url = self.item_url(id);
        self.send(self.client.delete(url.clone()), &url)?;
        log::debug!("DELETE {} accepted", url);
        Ok(())
    }

    fn endpoint(&self) -> String {
        self.base.to_string()
    }
}
