use reqwest::Url;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::header::{AUTHORIZATION, LINK, USER_AGENT};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::credentials::ModzyCredentials;
use crate::error::ClientError;
use crate::paging::{Links, PagingInput};
use crate::path::ApiPath;
use crate::requestor::{MultipartPart, Requestor};

trait ResponseExt {
    fn map_to_modzy_err(self) -> Result<reqwest::blocking::Response, ClientError>;
}

impl ResponseExt for reqwest::blocking::Response {
    fn map_to_modzy_err(self) -> Result<reqwest::blocking::Response, ClientError> {
        let status = self.status();
        if status.is_success() {
            Ok(self)
        } else {
            let text = self.text()?;
            Err(ClientError::from_status(status, &text))
        }
    }
}

/// Decodes a response body, treating an empty body as JSON `null`.
fn decode_body<R: DeserializeOwned>(
    response: reqwest::blocking::Response,
) -> Result<R, ClientError> {
    let text = response.text()?;
    let text = if text.trim().is_empty() { "null" } else { &text };
    Ok(serde_json::from_str(text)?)
}

/// A client for making HTTP requests to the Modzy API.
///
/// It carries the endpoint and credentials; every request is authorized with an
/// `ApiKey` header. Cloning is cheap, the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct Client {
    http_client: reqwest::blocking::Client,
    base_url: Url,
    credentials: ModzyCredentials,
    user_agent: String,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut endpoint = config.endpoint;
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        let base_url = Url::parse(&endpoint).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(Client {
            http_client,
            base_url,
            credentials: config.credentials,
            user_agent: config.user_agent,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join the given path to the base URL.
    fn join(&self, path: &ApiPath) -> Result<Url, ClientError> {
        path.resolve(&self.base_url)
    }

    fn request(
        &self,
        method: reqwest::Method,
        url: Url,
    ) -> reqwest::blocking::RequestBuilder {
        log::debug!("{method} {url}");
        self.http_client
            .request(method, url)
            .header(AUTHORIZATION, self.credentials.authorization())
            .header(USER_AGENT, &self.user_agent)
    }

    fn req<T: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        path: &ApiPath,
        body: Option<&T>,
    ) -> Result<reqwest::blocking::Response, ClientError> {
        let url = self.join(path)?;
        let request_builder = self.request(method, url);

        let request_builder = if let Some(body) = body {
            request_builder.json(body)
        } else {
            request_builder
        };

        let response = request_builder.send()?.map_to_modzy_err()?;

        Ok(response)
    }
}

impl Requestor for Client {
    fn get<R>(&self, path: &ApiPath) -> Result<R, ClientError>
    where
        R: DeserializeOwned,
    {
        let response = self.req(reqwest::Method::GET, path, None::<&()>)?;
        decode_body(response)
    }

    fn post<T, R>(&self, path: &ApiPath, body: &T) -> Result<R, ClientError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.req(reqwest::Method::POST, path, Some(body))?;
        decode_body(response)
    }

    fn patch<T, R>(&self, path: &ApiPath, body: &T) -> Result<R, ClientError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.req(reqwest::Method::PATCH, path, Some(body))?;
        decode_body(response)
    }

    fn delete<R>(&self, path: &ApiPath) -> Result<R, ClientError>
    where
        R: DeserializeOwned,
    {
        let response = self.req(reqwest::Method::DELETE, path, None::<&()>)?;
        decode_body(response)
    }

    fn list<R>(&self, path: &ApiPath, paging: &PagingInput) -> Result<(R, Links), ClientError>
    where
        R: DeserializeOwned,
    {
        let mut url = self.join(path)?;
        {
            let pairs = paging.query_pairs();
            if !pairs.is_empty() {
                url.query_pairs_mut().extend_pairs(pairs);
            }
        }

        let response = self
            .request(reqwest::Method::GET, url)
            .send()?
            .map_to_modzy_err()?;

        let header = response
            .headers()
            .get_all(LINK)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect::<Vec<_>>()
            .join(", ");
        let links = Links::parse(&header);

        Ok((decode_body(response)?, links))
    }

    fn post_multipart<R>(&self, path: &ApiPath, part: MultipartPart) -> Result<R, ClientError>
    where
        R: DeserializeOwned,
    {
        let url = self.join(path)?;
        let form = Form::new().part(
            part.field,
            Part::bytes(part.bytes).file_name(part.file_name),
        );

        let response = self
            .request(reqwest::Method::POST, url)
            .multipart(form)
            .send()?
            .map_to_modzy_err()?;

        decode_body(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(endpoint: &str) -> Client {
        let config = ClientConfig::builder(ModzyCredentials::new("key"))
            .with_endpoint(endpoint)
            .build();
        Client::new(config).unwrap()
    }

    #[test]
    fn endpoint_without_trailing_slash_keeps_api_segment() {
        let client = client("https://app.modzy.com/api");
        assert_eq!(
            client.join(&ApiPath::from("jobs/abc")).unwrap().as_str(),
            "https://app.modzy.com/api/jobs/abc"
        );
        assert_eq!(
            client.join(&ApiPath::from("/results/abc")).unwrap().as_str(),
            "https://app.modzy.com/api/results/abc"
        );
    }

    #[test]
    fn caller_chosen_segments_stay_in_the_job_path() {
        let client = client("https://app.modzy.com/api/");
        let url = client
            .join(
                &ApiPath::new("jobs")
                    .segment("job-1")
                    .segment("a/../../../models")
                    .segment("input"),
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://app.modzy.com/api/jobs/job-1/a%2F..%2F..%2F..%2Fmodels/input"
        );
    }

    #[test]
    fn invalid_endpoint_is_an_error() {
        let config = ClientConfig::builder(ModzyCredentials::new("key"))
            .with_endpoint("not a url")
            .build();
        assert!(matches!(
            Client::new(config),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
