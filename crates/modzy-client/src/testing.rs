//! In-process [`Requestor`] replaying canned responses.

use std::collections::VecDeque;
use std::sync::Mutex;

use modzy_api::{ApiPath, ClientError, Links, MultipartPart, PagingInput, Requestor};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub segments: Vec<String>,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
    pub part: Option<MultipartPart>,
}

type Reply = Result<(Value, Links), ClientError>;

/// Routes `log` output through the test harness. Safe to call from every test.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Answers requests in order from a queue and records every call it receives.
#[derive(Debug, Default)]
pub struct FakeRequestor {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeRequestor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, body: Value) -> Self {
        self.push(Ok((body, Links::default())))
    }

    pub fn reply_with_links(self, body: Value, links: Links) -> Self {
        self.push(Ok((body, links)))
    }

    pub fn fail(self, error: ClientError) -> Self {
        self.push(Err(error))
    }

    fn push(self, reply: Reply) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|call| format!("{} {}", call.method, call.path))
            .collect()
    }

    fn answer<R: DeserializeOwned>(&self, call: RecordedCall) -> Result<(R, Links), ClientError> {
        self.calls.lock().unwrap().push(call);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok((Value::Null, Links::default())));
        let (body, links) = reply?;
        Ok((serde_json::from_value(body)?, links))
    }

    fn call(method: &'static str, path: &ApiPath, body: Option<Value>) -> RecordedCall {
        RecordedCall {
            method,
            path: path.to_string(),
            segments: path.segments().to_vec(),
            body,
            query: Vec::new(),
            part: None,
        }
    }
}

impl Requestor for FakeRequestor {
    fn get<R>(&self, path: &ApiPath) -> Result<R, ClientError>
    where
        R: DeserializeOwned,
    {
        self.answer(Self::call("GET", path, None)).map(|(r, _)| r)
    }

    fn post<T, R>(&self, path: &ApiPath, body: &T) -> Result<R, ClientError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.answer(Self::call("POST", path, Some(body))).map(|(r, _)| r)
    }

    fn patch<T, R>(&self, path: &ApiPath, body: &T) -> Result<R, ClientError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.answer(Self::call("PATCH", path, Some(body))).map(|(r, _)| r)
    }

    fn delete<R>(&self, path: &ApiPath) -> Result<R, ClientError>
    where
        R: DeserializeOwned,
    {
        self.answer(Self::call("DELETE", path, None)).map(|(r, _)| r)
    }

    fn list<R>(&self, path: &ApiPath, paging: &PagingInput) -> Result<(R, Links), ClientError>
    where
        R: DeserializeOwned,
    {
        let mut call = Self::call("GET", path, None);
        call.query = paging.query_pairs();
        self.answer(call)
    }

    fn post_multipart<R>(&self, path: &ApiPath, part: MultipartPart) -> Result<R, ClientError>
    where
        R: DeserializeOwned,
    {
        let mut call = Self::call("MULTIPART", path, None);
        call.part = Some(part);
        self.answer(call).map(|(r, _)| r)
    }
}
