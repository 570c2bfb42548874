pub mod category;
pub mod customer;
pub mod method;
pub mod payment;
pub mod user;

pub use category::{Category, CategoryDraft};
pub use customer::{Customer, CustomerDraft};
pub use method::{Method, MethodDraft};
pub use payment::{Payment, PaymentDraft};
pub use user::{NewUser, User};

/// Renders timestamps as `YYYY-MM-DD HH:MM:SS`
pub(crate) mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::Serializer;

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }
}
