//! Path addressing for every view.

use std::fmt;

use serde::{Serialize, Serializer};
use url::Url;

use crate::Id;

/// Base the relative paths are resolved against. Only the path and query
/// of the result are used.
const BASE: &str = "http://dealsdive.local/";

/// A navigable location.
///
/// Routes round-trip through their path form: `Route::parse(&r.to_path())`
/// gives back `r`. Identifiers are percent-encoded in the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Catalog,
    /// `/search`
    Search,
    /// `/chat`
    Conversations,
    /// `/chat/{id}`
    Conversation(Id),
    /// `/agreement/{id}`
    Agreement(Id),
    /// `/payment/{id}?amount=N`
    Payment { id: Id, amount: Option<u64> },
    /// Any path that names no view. Holds the path as given.
    NotFound(String),
}

impl Route {
    /// Interpret a path such as `/payment/b1?amount=250000`.
    ///
    /// Trailing slashes are ignored. A payment amount that is missing, not
    /// a number, or zero is dropped and the default amount applies later.
    pub fn parse(path: &str) -> Route {
        let url = match Url::parse(BASE).and_then(|base| base.join(path.trim())) {
            Ok(url) => url,
            Err(_) => return Route::NotFound(path.to_string()),
        };
        let raw: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();
        let decoded: Option<Vec<String>> = raw
            .iter()
            .map(|s| urlencoding::decode(s).ok().map(|s| s.into_owned()))
            .collect();
        let Some(decoded) = decoded else {
            return Route::NotFound(path.to_string());
        };
        let segments: Vec<&str> = decoded.iter().map(String::as_str).collect();

        match segments.as_slice() {
            [] => Route::Catalog,
            ["search"] => Route::Search,
            ["chat"] => Route::Conversations,
            ["chat", id] => Route::Conversation(Id::from(*id)),
            ["agreement", id] => Route::Agreement(Id::from(*id)),
            ["payment", id] => {
                let amount = url
                    .query_pairs()
                    .find(|(key, _)| key == "amount")
                    .and_then(|(_, value)| value.parse::<u64>().ok())
                    .filter(|amount| *amount > 0);
                Route::Payment {
                    id: Id::from(*id),
                    amount,
                }
            }
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Route::Catalog => "/".to_string(),
            Route::Search => "/search".to_string(),
            Route::Conversations => "/chat".to_string(),
            Route::Conversation(id) => format!("/chat/{}", encode(id)),
            Route::Agreement(id) => format!("/agreement/{}", encode(id)),
            Route::Payment {
                id,
                amount: Some(amount),
            } => format!("/payment/{}?amount={amount}", encode(id)),
            Route::Payment { id, amount: None } => format!("/payment/{}", encode(id)),
            Route::NotFound(path) => path.clone(),
        }
    }
}

fn encode(id: &Id) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(id.as_str())
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
