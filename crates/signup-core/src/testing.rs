//! In-memory fakes for driving the controller in tests.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::api::{AccountRequest, CheckoutCreated, SignupApi};
use crate::draft::{CheckoutSessionId, CompanyId, CompanyInfo, SignupDraft};
use crate::error::{Result, SignupError, StoreError};
use crate::navigation::Navigator;
use crate::store::{DurableStore, MemoryStore, SignupStash};

/// How the fake backend answers
#[derive(Clone, Debug, Default)]
pub enum Reply {
    #[default]
    Succeed,
    /// `success: false` with this error message
    Reject(String),
    /// Transport failure
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiCall {
    Checkout {
        company: CompanyInfo,
        idempotency_key: Uuid,
    },
    Verify {
        session_id: String,
        company_id: CompanyId,
    },
    Account(AccountRequest),
}

pub struct FakeSignupApi {
    company_id: CompanyId,
    checkout_url: String,
    checkout: RefCell<Reply>,
    verify: RefCell<Reply>,
    account: RefCell<Reply>,
    calls: RefCell<Vec<ApiCall>>,
}

impl FakeSignupApi {
    pub fn new(company_id: i64, checkout_url: &str) -> Self {
        Self {
            company_id: CompanyId::new(company_id),
            checkout_url: checkout_url.to_string(),
            checkout: RefCell::default(),
            verify: RefCell::default(),
            account: RefCell::default(),
            calls: RefCell::default(),
        }
    }

    pub fn set_checkout(&self, reply: Reply) {
        self.checkout.replace(reply);
    }

    pub fn set_verify(&self, reply: Reply) {
        self.verify.replace(reply);
    }

    pub fn set_account(&self, reply: Reply) {
        self.account.replace(reply);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.borrow().clone()
    }

    fn answer(reply: &RefCell<Reply>) -> Result<()> {
        match &*reply.borrow() {
            Reply::Succeed => Ok(()),
            Reply::Reject(msg) => Err(SignupError::Rejected(msg.clone())),
            Reply::Fail => Err(SignupError::Network("connection refused".into())),
        }
    }
}

#[async_trait(?Send)]
impl SignupApi for FakeSignupApi {
    async fn create_checkout_session(
        &self,
        company: &CompanyInfo,
        idempotency_key: Uuid,
    ) -> Result<CheckoutCreated> {
        self.calls.borrow_mut().push(ApiCall::Checkout {
            company: company.clone(),
            idempotency_key,
        });
        Self::answer(&self.checkout)?;
        Ok(CheckoutCreated {
            company_id: self.company_id,
            checkout_url: self.checkout_url.clone(),
        })
    }

    async fn verify_session(
        &self,
        session_id: &CheckoutSessionId,
        company_id: CompanyId,
    ) -> Result<bool> {
        self.calls.borrow_mut().push(ApiCall::Verify {
            session_id: session_id.as_str().to_string(),
            company_id,
        });
        match Self::answer(&self.verify) {
            Ok(()) => Ok(true),
            Err(SignupError::Rejected(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn create_account(&self, request: &AccountRequest) -> Result<()> {
        self.calls.borrow_mut().push(ApiCall::Account(request.clone()));
        Self::answer(&self.account)
    }
}

/// What the store held at the moment a navigation happened
#[derive(Clone, Debug)]
pub struct Visit {
    pub url: String,
    pub company_id: Option<CompanyId>,
    pub draft: Option<SignupDraft>,
}

pub struct RecordingNavigator {
    stash: SignupStash<Rc<MemoryStore>>,
    visits: RefCell<Vec<Visit>>,
}

impl RecordingNavigator {
    pub fn new(store: Rc<MemoryStore>) -> Self {
        Self {
            stash: SignupStash::new(store),
            visits: RefCell::default(),
        }
    }

    pub fn visits(&self) -> Vec<Visit> {
        self.visits.borrow().clone()
    }

    pub fn last_url(&self) -> Option<String> {
        self.visits.borrow().last().map(|v| v.url.clone())
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &str) -> Result<()> {
        self.visits.borrow_mut().push(Visit {
            url: url.to_string(),
            company_id: self.stash.company_id()?,
            draft: self.stash.draft()?,
        });
        Ok(())
    }
}

/// Tab storage whose `clear` fails for chosen keys
pub struct FlakyStore {
    inner: Rc<MemoryStore>,
    failing: RefCell<Vec<String>>,
}

impl FlakyStore {
    pub fn new(inner: Rc<MemoryStore>) -> Self {
        Self {
            inner,
            failing: RefCell::default(),
        }
    }

    pub fn fail_clear(&self, keys: &[&str]) {
        self.failing
            .replace(keys.iter().map(ToString::to_string).collect());
    }
}

impl DurableStore for FlakyStore {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> std::result::Result<(), StoreError> {
        self.inner.set(key, value)
    }

    fn clear(&self, key: &str) -> std::result::Result<(), StoreError> {
        if self.failing.borrow().iter().any(|k| k == key) {
            return Err(StoreError::Unavailable("storage quota exceeded".into()));
        }
        self.inner.clear(key)
    }
}

/// Navigator the browser refuses
pub struct BlockedNavigator;

impl Navigator for BlockedNavigator {
    fn navigate(&self, _url: &str) -> Result<()> {
        Err(SignupError::Navigation("navigation blocked".into()))
    }
}
