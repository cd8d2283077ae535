use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use crate::error::ApiError;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use rocket::http::{Cookie, CookieJar, Status};
use rocket::request::{self, FromRequest, Outcome};
use rocket::Request;
use serde::{Deserialize, Serialize};

use super::models::UserLoggedIn;

pub(crate) const SESSION_COOKIE: &str = "session";
const MAX_SESSION_AGE: Duration = Duration::from_secs(60 * 60 * 24 * 30);

/// Value of the private session cookie.
#[derive(Serialize, Deserialize)]
pub(crate) struct SessionCookie {
    pub(crate) session_key: String,
    pub(crate) creation_time: SystemTime,
}

/// Session key to user id registry. `login` opens sessions, the
/// `UserLoggedIn` guard resolves them.
pub(crate) struct UserSession {
    sessions: Mutex<HashMap<String, i32>>,
}

fn generate_session_key() -> String {
    const LEN: usize = 32;

    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(LEN)
        .map(char::from)
        .collect()
}

impl UserSession {
    pub(crate) fn new() -> UserSession {
        UserSession {
            sessions: Mutex::new(HashMap::<String, i32>::new()),
        }
    }

    /// Registers a session for `user_id` and returns the cookie to hand out.
    pub(crate) fn open(&self, user_id: i32) -> Result<SessionCookie, ApiError> {
        let session_key = generate_session_key();
        self.sessions
            .lock()
            .map_err(|_| ApiError::new("Couldn't update user session"))?
            .insert(session_key.clone(), user_id);

        Ok(SessionCookie {
            session_key,
            creation_time: SystemTime::now(),
        })
    }

    /// Opens a session and stores it in the private session cookie.
    pub(crate) fn start(&self, cookies: &CookieJar<'_>, user_id: i32) -> Result<(), ApiError> {
        let session = self.open(user_id)?;
        let cookie_string = serde_json::to_string(&session)
            .map_err(|err| ApiError::new(format!("Couldn't create session cookie {}", err)))?;

        cookies.add_private(Cookie::new(SESSION_COOKIE, cookie_string));
        Ok(())
    }

    fn user_id(&self, session_key: &str) -> Result<i32, ApiError> {
        self.sessions
            .lock()
            .map_err(|_| ApiError::new("Couldn't get user sessions"))?
            .get(session_key)
            .copied()
            .ok_or_else(|| ApiError::new("No session found"))
    }
}

fn resolve_caller(req: &Request<'_>) -> Result<UserLoggedIn, ApiError> {
    let session_cookie = req
        .cookies()
        .get_private(SESSION_COOKIE)
        .ok_or_else(|| ApiError::new("No session set"))?;

    let session_cookie_value = serde_json::from_str::<SessionCookie>(session_cookie.value())
        .map_err(|_| ApiError::new("Couldn't parse session"))?;

    let session_age = session_cookie_value
        .creation_time
        .elapsed()
        .map_err(|_| ApiError::new("Couldn't determine session age"))?;
    if session_age > MAX_SESSION_AGE {
        return Err(ApiError::new("Session too old"));
    }

    let sessions = req
        .rocket()
        .state::<UserSession>()
        .ok_or_else(|| ApiError::new("Couldn't get UserSession"))?;

    sessions
        .user_id(&session_cookie_value.session_key)
        .map(UserLoggedIn)
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for UserLoggedIn {
    type Error = ApiError;

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        match resolve_caller(req) {
            Ok(user) => Outcome::Success(user),
            Err(err) => Outcome::Error((Status::Unauthorized, err)),
        }
    }
}
