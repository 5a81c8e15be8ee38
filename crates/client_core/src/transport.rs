use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::Item,
    error::ApiError,
    protocol::{ReorderRequest, ReorderResponse, ITEMS_ROUTE, REORDER_ROUTE},
};
use tracing::debug;
use url::Url;

use crate::{error::ClientError, ItemsApi};

/// [`ItemsApi`] over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpItemsClient {
    http: Client,
    base_url: Url,
}

impl HttpItemsClient {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(server_url).map_err(|source| ClientError::InvalidUrl {
            url: server_url.to_string(),
            source,
        })?;
        // Routes are joined relative to the base, which needs a trailing slash to keep its path.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, route: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(route.trim_start_matches('/'))
            .map_err(|source| ClientError::InvalidUrl {
                url: format!("{}{route}", self.base_url),
                source,
            })
    }
}

#[async_trait]
impl ItemsApi for HttpItemsClient {
    async fn list_items(&self) -> Result<Vec<Item>, ClientError> {
        let res = self.http.get(self.endpoint(ITEMS_ROUTE)?).send().await?;
        decode(res).await
    }

    async fn reorder(&self, request: &ReorderRequest) -> Result<ReorderResponse, ClientError> {
        debug!(
            moved_item_id = %request.moved_item_id,
            from_index = request.from_index,
            to_index = request.to_index,
            "posting reorder"
        );
        let res = self
            .http
            .post(self.endpoint(REORDER_ROUTE)?)
            .json(request)
            .send()
            .await?;
        decode(res).await
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res.json().await?);
    }

    let body = res.text().await?;
    match serde_json::from_str::<ApiError>(&body) {
        Ok(error) => Err(ClientError::Api {
            status: status.as_u16(),
            error,
        }),
        Err(_) => Err(ClientError::UnexpectedResponse {
            status: status.as_u16(),
            body,
        }),
    }
}
