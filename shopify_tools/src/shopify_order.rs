use chrono::Utc;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The subset of a Shopify REST `Order` resource that is used to match orders against formation requests.
///
/// Shopify omits or nulls many fields depending on the sales channel, so almost everything has a default.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShopifyOrder {
    pub id: i64,
    /// The human-readable order name, e.g. "#1001"
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub order_number: i64,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub cart_token: Option<String>,
    #[serde(default)]
    pub checkout_token: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub note_attributes: Vec<NameValue>,
    #[serde(default)]
    pub currency: String,
    /// `paid`, `partially_paid`, `pending`, `authorized`, `voided`, `refunded` etc.
    #[serde(default)]
    pub financial_status: Option<String>,
    /// True for orders placed through the Bogus gateway or a store in test mode
    #[serde(default)]
    pub test: bool,
    #[serde(default)]
    pub total_price: String,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub billing_address: Option<OrderAddress>,
    #[serde(default)]
    pub shipping_address: Option<OrderAddress>,
    #[serde(default)]
    pub cancelled_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LineItem {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub properties: Vec<NameValue>,
}

/// Shopify's name/value pair, used for both order-level note attributes and line item properties.
///
/// Values are usually strings, but storefront scripts can put any JSON scalar in them.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NameValue {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

impl NameValue {
    pub fn new<S: Into<String>>(name: S, value: S) -> Self {
        Self { name: name.into(), value: Value::String(value.into()) }
    }

    /// The value as a string. Numbers and booleans are stringified, `null`s, arrays and objects give `None`.
    pub fn value_as_string(&self) -> Option<String> {
        match &self.value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OrderAddress {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

impl OrderAddress {
    pub fn with_company(company: &str) -> Self {
        Self { company: Some(company.to_string()), ..Default::default() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrderBuilder {
    name: Option<String>,
    cart_token: Option<String>,
    checkout_token: Option<String>,
    created_at: Option<String>,
    note: Option<String>,
    note_attributes: Vec<NameValue>,
    currency: Option<String>,
    financial_status: Option<String>,
    test: bool,
    total_price: Option<String>,
    line_items: Vec<LineItem>,
    billing_address: Option<OrderAddress>,
    shipping_address: Option<OrderAddress>,
}

impl OrderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&mut self, name: &str) -> &mut Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn cart_token(&mut self, token: &str) -> &mut Self {
        self.cart_token = Some(token.to_string());
        self
    }

    pub fn checkout_token(&mut self, token: &str) -> &mut Self {
        self.checkout_token = Some(token.to_string());
        self
    }

    pub fn created_at(&mut self, created_at: &str) -> &mut Self {
        self.created_at = Some(created_at.to_string());
        self
    }

    pub fn note(&mut self, note: &str) -> &mut Self {
        self.note = Some(note.to_string());
        self
    }

    pub fn note_attribute(&mut self, name: &str, value: &str) -> &mut Self {
        self.note_attributes.push(NameValue::new(name, value));
        self
    }

    pub fn currency(&mut self, currency: &str) -> &mut Self {
        self.currency = Some(currency.to_string());
        self
    }

    pub fn financial_status(&mut self, status: &str) -> &mut Self {
        self.financial_status = Some(status.to_string());
        self
    }

    pub fn test(&mut self, test: bool) -> &mut Self {
        self.test = test;
        self
    }

    pub fn total_price(&mut self, total_price: &str) -> &mut Self {
        self.total_price = Some(total_price.to_string());
        self
    }

    /// Adds a single line item carrying the given properties.
    pub fn line_item_with_properties(&mut self, properties: &[(&str, &str)]) -> &mut Self {
        let properties = properties.iter().map(|(k, v)| NameValue::new(*k, *v)).collect();
        #[allow(clippy::cast_possible_wrap)]
        let id = (rand::thread_rng().next_u64() >> 1) as i64;
        let item = LineItem { id, title: "Formation package".into(), quantity: 1, properties, ..Default::default() };
        self.line_items.push(item);
        self
    }

    pub fn billing_company(&mut self, company: &str) -> &mut Self {
        self.billing_address = Some(OrderAddress::with_company(company));
        self
    }

    pub fn shipping_company(&mut self, company: &str) -> &mut Self {
        self.shipping_address = Some(OrderAddress::with_company(company));
        self
    }

    pub fn build(&self) -> ShopifyOrder {
        let mut rng = rand::thread_rng();
        #[allow(clippy::cast_possible_wrap)]
        let id = (rng.next_u64() >> 1) as i64;
        let order_number = rng.gen_range(1000..100_000);
        ShopifyOrder {
            id,
            name: self.name.clone().unwrap_or_else(|| format!("#{order_number}")),
            order_number,
            token: Some(format!("{:x}", rng.next_u64())),
            cart_token: self.cart_token.clone(),
            checkout_token: self.checkout_token.clone(),
            email: Some(format!("{}@example.com", rng.gen_range(0..1000))),
            created_at: self.created_at.clone().unwrap_or_else(|| Utc::now().to_rfc3339()),
            updated_at: Some(Utc::now().to_rfc3339()),
            note: self.note.clone(),
            note_attributes: self.note_attributes.clone(),
            currency: self.currency.clone().unwrap_or_else(|| "USD".to_string()),
            financial_status: Some(self.financial_status.clone().unwrap_or_else(|| "pending".to_string())),
            test: self.test,
            total_price: self.total_price.clone().unwrap_or_else(|| format!("{}.00", rng.gen_range(50..1_000))),
            line_items: self.line_items.clone(),
            billing_address: self.billing_address.clone(),
            shipping_address: self.shipping_address.clone(),
            cancelled_at: None,
        }
    }
}
