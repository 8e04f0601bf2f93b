//! Inventory domain module (event-sourced).
//!
//! This crate contains the business rules for perishable basket stock,
//! implemented purely as deterministic domain logic (no IO, no clock reads).

pub mod basket;
pub mod pricing;
pub mod warehouse;

pub use basket::{Basket, BasketId};
pub use pricing::{DEFAULT_MARKUP_RATE, PricingPolicy, Quote};
pub use warehouse::{
    BasketsSold, DeliveryReceived, DiscardExpired, ExpiredDiscarded, MAX_DELIVERY_QUANTITY,
    ReceiveDelivery, SellBaskets, Warehouse, WarehouseCommand, WarehouseEvent, WarehouseId,
};
