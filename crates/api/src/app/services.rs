//! In-memory backing data for the demo routes.
//!
//! The handlers only exist to show the gate in front of real work; this is
//! deliberately a plain map behind a lock.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use crate::app::dto::{AccountResponse, CustomerResponse};

#[derive(Debug, Default)]
pub struct Directory {
    customers: RwLock<BTreeMap<String, CustomerResponse>>,
    accounts: Vec<AccountResponse>,
}

impl Directory {
    /// Directory pre-populated with a few customers and ledger accounts.
    pub fn seeded() -> Self {
        let customers = [("c-1", "Acme Corp"), ("c-2", "Globex"), ("c-3", "Initech")]
            .into_iter()
            .map(|(id, name)| {
                (
                    id.to_string(),
                    CustomerResponse {
                        id: id.to_string(),
                        name: name.to_string(),
                    },
                )
            })
            .collect();

        let accounts = [("1000", "Cash"), ("1200", "Receivables"), ("4000", "Revenue")]
            .into_iter()
            .map(|(code, name)| AccountResponse {
                code: code.to_string(),
                name: name.to_string(),
            })
            .collect();

        Self {
            customers: RwLock::new(customers),
            accounts,
        }
    }

    pub fn customers(&self) -> Vec<CustomerResponse> {
        self.customers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// Remove a customer; `false` if it did not exist.
    pub fn remove_customer(&self, id: &str) -> bool {
        self.customers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .is_some()
    }

    pub fn accounts(&self) -> &[AccountResponse] {
        &self.accounts
    }
}
