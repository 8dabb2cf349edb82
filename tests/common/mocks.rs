//! Mock implementations for testing.
//!
//! `MockDatabase` keeps records in memory and counts every write, so tests can
//! assert that a rejected request never reached storage.

#![allow(dead_code)]

use async_trait::async_trait;
use clientbook::db::{Customer, CustomerUpdate, DatabaseClient, NewCustomer, User, UserUpdate};
use clientbook::types::{AppError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct MockState {
    users: HashMap<String, (User, Option<String>)>,
    customers: HashMap<String, Customer>,
}

/// In-memory `DatabaseClient` with a write counter.
#[derive(Default)]
pub struct MockDatabase {
    state: Mutex<MockState>,
    writes: AtomicUsize,
    fail_reads: bool,
}

impl MockDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// A database whose reads always fail, to exercise error mapping.
    pub fn failing() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    /// Number of mutating calls made so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Stored active-token digest for `user_id`, bypassing the trait.
    pub fn stored_token(&self, user_id: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.users.get(user_id).and_then(|(_, token)| token.clone())
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }

    fn check_reads(&self) -> Result<()> {
        if self.fail_reads {
            return Err(AppError::Database("mock read failure".to_string()));
        }
        Ok(())
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn page<T>(items: Vec<T>, limit: u32, offset: u32) -> Vec<T> {
    items
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect()
}

#[async_trait]
impl DatabaseClient for MockDatabase {
    async fn create_user(
        &self,
        id: &str,
        email: &str,
        password_hash: &str,
        name: &str,
        role: &str,
    ) -> Result<()> {
        self.record_write();
        let mut state = self.state.lock().unwrap();
        if state.users.values().any(|(u, _)| u.email == email) {
            return Err(AppError::ConstraintViolation(
                "UNIQUE constraint failed: users.email".to_string(),
            ));
        }

        let ts = now();
        let user = User {
            id: id.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            created_at: ts,
            updated_at: ts,
        };
        state.users.insert(id.to_string(), (user, None));
        Ok(())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .values()
            .find(|(u, _)| u.email == email)
            .map(|(u, _)| u.clone()))
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        Ok(state.users.get(id).map(|(u, _)| u.clone()))
    }

    async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<User> {
        self.record_write();
        let mut state = self.state.lock().unwrap();
        let (user, token) = state
            .users
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        if let Some(ref email) = update.email {
            user.email = email.clone();
        }
        if let Some(ref name) = update.name {
            user.name = name.clone();
        }
        if let Some(ref hash) = update.password_hash {
            user.password_hash = hash.clone();
            *token = None;
        }
        user.updated_at = now();
        Ok(user.clone())
    }

    async fn delete_user(&self, id: &str) -> Result<()> {
        self.record_write();
        let mut state = self.state.lock().unwrap();
        state
            .users
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    async fn list_users(&self, limit: u32, offset: u32) -> Result<(Vec<User>, i64)> {
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        let mut users: Vec<User> = state.users.values().map(|(u, _)| u.clone()).collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        let total = users.len() as i64;
        Ok((page(users, limit, offset), total))
    }

    async fn set_active_token(&self, user_id: &str, token_hash: Option<&str>) -> Result<()> {
        self.record_write();
        let mut state = self.state.lock().unwrap();
        let (_, token) = state
            .users
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;
        *token = token_hash.map(str::to_string);
        Ok(())
    }

    async fn get_active_token(&self, user_id: &str) -> Result<Option<String>> {
        self.check_reads()?;
        Ok(self.stored_token(user_id))
    }

    async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer> {
        self.record_write();
        let ts = now();
        let record = Customer {
            id: customer.id.clone(),
            name: customer.name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            address: customer.address.clone(),
            created_at: ts,
            updated_at: ts,
        };
        self.state
            .lock()
            .unwrap()
            .customers
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn get_customer(&self, id: &str) -> Result<Option<Customer>> {
        self.check_reads()?;
        Ok(self.state.lock().unwrap().customers.get(id).cloned())
    }

    async fn update_customer(&self, id: &str, update: &CustomerUpdate) -> Result<Customer> {
        self.record_write();
        let mut state = self.state.lock().unwrap();
        let customer = state
            .customers
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Customer {} not found", id)))?;

        if let Some(ref name) = update.name {
            customer.name = name.clone();
        }
        if let Some(ref email) = update.email {
            customer.email = Some(email.clone());
        }
        if let Some(ref phone) = update.phone {
            customer.phone = phone.clone();
        }
        if let Some(ref address) = update.address {
            customer.address = Some(address.clone());
        }
        customer.updated_at = now();
        Ok(customer.clone())
    }

    async fn delete_customer(&self, id: &str) -> Result<()> {
        self.record_write();
        self.state
            .lock()
            .unwrap()
            .customers
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Customer {} not found", id)))
    }

    async fn list_customers(&self, limit: u32, offset: u32) -> Result<(Vec<Customer>, i64)> {
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        let mut customers: Vec<Customer> = state.customers.values().cloned().collect();
        customers.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        let total = customers.len() as i64;
        Ok((page(customers, limit, offset), total))
    }
}
