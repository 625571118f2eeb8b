//! Provider-agnostic view of an order in the external commerce system.
//!
//! Order feed backends convert whatever their platform returns into a [`CommerceOrder`]. The matching, ranking and
//! classification logic only ever sees this normalised form.
use chrono::{DateTime, Duration, Utc};
use fp_common::Cents;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// A key/value pair attached to an order or a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAttribute {
    pub name: String,
    pub value: String,
}

impl OrderAttribute {
    pub fn new(name: &str, value: &str) -> Self {
        Self { name: name.to_string(), value: value.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommerceLineItem {
    pub title: String,
    pub properties: Vec<OrderAttribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommerceOrder {
    pub id: String,
    pub order_number: String,
    pub financial_status: String,
    pub is_test: bool,
    pub total_price: Cents,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub note: Option<String>,
    pub note_attributes: Vec<OrderAttribute>,
    pub line_items: Vec<CommerceLineItem>,
    pub billing_company: Option<String>,
    pub shipping_company: Option<String>,
    pub checkout_token: Option<String>,
    pub cart_token: Option<String>,
}

impl CommerceOrder {
    /// The financial status, lower-cased and trimmed.
    pub fn normalized_financial_status(&self) -> String {
        self.financial_status.trim().to_ascii_lowercase()
    }

    pub fn company_names(&self) -> impl Iterator<Item = &str> {
        self.billing_company.iter().chain(self.shipping_company.iter()).map(String::as_str)
    }

    pub fn session_tokens(&self) -> impl Iterator<Item = &str> {
        self.checkout_token.iter().chain(self.cart_token.iter()).map(String::as_str)
    }

    pub fn line_item_properties(&self) -> impl Iterator<Item = &OrderAttribute> {
        self.line_items.iter().flat_map(|item| item.properties.iter())
    }
}

/// Builds [`CommerceOrder`]s with sensible random defaults. Mostly useful for tests and for order feed adapters.
#[derive(Debug, Clone, Default)]
pub struct CommerceOrderBuilder {
    id: Option<String>,
    order_number: Option<String>,
    financial_status: Option<String>,
    is_test: bool,
    total_price: Option<Cents>,
    currency: Option<String>,
    created_at: Option<DateTime<Utc>>,
    note: Option<String>,
    note_attributes: Vec<OrderAttribute>,
    line_items: Vec<CommerceLineItem>,
    billing_company: Option<String>,
    shipping_company: Option<String>,
    checkout_token: Option<String>,
    cart_token: Option<String>,
}

impl CommerceOrderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&mut self, id: &str) -> &mut Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn order_number(&mut self, number: &str) -> &mut Self {
        self.order_number = Some(number.to_string());
        self
    }

    pub fn financial_status(&mut self, status: &str) -> &mut Self {
        self.financial_status = Some(status.to_string());
        self
    }

    pub fn test_order(&mut self, is_test: bool) -> &mut Self {
        self.is_test = is_test;
        self
    }

    pub fn total_price(&mut self, price: Cents) -> &mut Self {
        self.total_price = Some(price);
        self
    }

    pub fn currency(&mut self, currency: &str) -> &mut Self {
        self.currency = Some(currency.to_string());
        self
    }

    pub fn created_at(&mut self, created_at: DateTime<Utc>) -> &mut Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets `created_at` to `minutes` minutes ago.
    pub fn created_minutes_ago(&mut self, minutes: i64) -> &mut Self {
        self.created_at = Some(Utc::now() - Duration::minutes(minutes));
        self
    }

    pub fn note(&mut self, note: &str) -> &mut Self {
        self.note = Some(note.to_string());
        self
    }

    pub fn note_attribute(&mut self, name: &str, value: &str) -> &mut Self {
        self.note_attributes.push(OrderAttribute::new(name, value));
        self
    }

    pub fn line_item_property(&mut self, name: &str, value: &str) -> &mut Self {
        let properties = vec![OrderAttribute::new(name, value)];
        self.line_items.push(CommerceLineItem { title: "Formation package".to_string(), properties });
        self
    }

    pub fn billing_company(&mut self, company: &str) -> &mut Self {
        self.billing_company = Some(company.to_string());
        self
    }

    pub fn shipping_company(&mut self, company: &str) -> &mut Self {
        self.shipping_company = Some(company.to_string());
        self
    }

    pub fn checkout_token(&mut self, token: &str) -> &mut Self {
        self.checkout_token = Some(token.to_string());
        self
    }

    pub fn cart_token(&mut self, token: &str) -> &mut Self {
        self.cart_token = Some(token.to_string());
        self
    }

    pub fn build(&self) -> CommerceOrder {
        let mut rng = rand::thread_rng();
        let id = self.id.clone().unwrap_or_else(|| (rng.next_u64() >> 1).to_string());
        let order_number = self.order_number.clone().unwrap_or_else(|| format!("#{}", 1000 + rng.next_u32() % 9000));
        CommerceOrder {
            id,
            order_number,
            financial_status: self.financial_status.clone().unwrap_or_else(|| "pending".to_string()),
            is_test: self.is_test,
            total_price: self.total_price.unwrap_or_else(|| Cents::from_units(249)),
            currency: self.currency.clone().unwrap_or_else(|| "USD".to_string()),
            created_at: self.created_at.unwrap_or_else(Utc::now),
            note: self.note.clone(),
            note_attributes: self.note_attributes.clone(),
            line_items: self.line_items.clone(),
            billing_company: self.billing_company.clone(),
            shipping_company: self.shipping_company.clone(),
            checkout_token: self.checkout_token.clone(),
            cart_token: self.cart_token.clone(),
        }
    }
}
