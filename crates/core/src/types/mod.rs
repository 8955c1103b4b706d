//! Core types for the thrift storefront.
//!
//! This module provides type-safe wrappers and records for the marketplace
//! domain.

pub mod email;
pub mod id;
pub mod notification;
pub mod product;
pub mod reference;
pub mod settings;
pub mod support;
pub mod user;

pub use email::{Email, EmailError};
pub use id::*;
pub use notification::Notification;
pub use product::{NewProduct, Product, ProductFilters, ProductUpdate, SellerFilter};
pub use reference::{Faq, Store};
pub use settings::{LocaleSettings, NotificationSettings};
pub use support::{NewSupportTicket, PendingSupportTicket, SupportTicket};
pub use user::{LoginPayload, RegisterPayload, User, UserUpdate};
