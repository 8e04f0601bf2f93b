use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use larder_core::{Aggregate, AggregateRoot, DomainError, Entity, Money, remove_by_id};
use larder_events::Event;

use crate::basket::{Basket, BasketId};
use crate::pricing::PricingPolicy;

/// Warehouse identifier (aggregate id).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WarehouseId(pub Uuid);

impl WarehouseId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for WarehouseId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for WarehouseId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Largest delivery accepted in one call.
///
/// Each basket is held individually, so an unbounded count would try to
/// allocate billions of them.
pub const MAX_DELIVERY_QUANTITY: u32 = 1_000_000;

/// Aggregate root: Warehouse (the basket stock).
///
/// Stock is kept in receipt order. Removal always goes through `BasketId`s
/// carried by the event, so baskets that merely share a price with the ones
/// being removed are never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warehouse {
    id: WarehouseId,
    pricing: PricingPolicy,
    baskets: Vec<Basket>,
    next_basket_id: u64,
    version: u64,
}

impl Warehouse {
    /// Create an empty warehouse.
    pub fn empty(id: WarehouseId, pricing: PricingPolicy) -> Self {
        Self {
            id,
            pricing,
            baskets: Vec::new(),
            next_basket_id: 1,
            version: 0,
        }
    }

    pub fn pricing(&self) -> &PricingPolicy {
        &self.pricing
    }

    /// Baskets in the order they were received.
    pub fn baskets(&self) -> &[Basket] {
        &self.baskets
    }

    pub fn len(&self) -> usize {
        self.baskets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.baskets.is_empty()
    }

    pub fn count_expired(&self, today: NaiveDate) -> usize {
        self.baskets.iter().filter(|b| b.is_expired(today)).count()
    }

    /// The `quantity` cheapest baskets, ties broken by receipt order.
    pub fn cheapest(&self, quantity: usize) -> Vec<&Basket> {
        let mut by_price: Vec<&Basket> = self.baskets.iter().collect();
        // Stable sort: equal prices keep receipt order.
        by_price.sort_by_key(|b| b.unit_sale_price());
        by_price.truncate(quantity);
        by_price
    }
}

impl AggregateRoot for Warehouse {
    type Id = WarehouseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: ReceiveDelivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveDelivery {
    /// Total paid for the whole delivery.
    pub delivery_price: Money,
    pub quantity: u32,
    pub expiry_date: NaiveDate,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SellBaskets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellBaskets {
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DiscardExpired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscardExpired {
    /// Baskets with an expiry date strictly before this are discarded.
    pub today: NaiveDate,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarehouseCommand {
    ReceiveDelivery(ReceiveDelivery),
    SellBaskets(SellBaskets),
    DiscardExpired(DiscardExpired),
}

/// Event: DeliveryReceived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceived {
    /// Id of the first new basket; the rest follow consecutively.
    pub first_basket_id: BasketId,
    pub quantity: u32,
    pub delivery_price: Money,
    pub unit_cost: Money,
    pub unit_sale_price: Money,
    pub expiry_date: NaiveDate,
    pub occurred_at: DateTime<Utc>,
}

/// Event: BasketsSold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketsSold {
    pub basket_ids: Vec<BasketId>,
    pub sale_value: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ExpiredDiscarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiredDiscarded {
    pub basket_ids: Vec<BasketId>,
    /// Sale value the discarded baskets would have fetched.
    pub lost_value: Money,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarehouseEvent {
    DeliveryReceived(DeliveryReceived),
    BasketsSold(BasketsSold),
    ExpiredDiscarded(ExpiredDiscarded),
}

impl WarehouseEvent {
    /// Number of baskets the event added or removed.
    pub fn quantity(&self) -> u32 {
        match self {
            WarehouseEvent::DeliveryReceived(e) => e.quantity,
            WarehouseEvent::BasketsSold(e) => len_u32(&e.basket_ids),
            WarehouseEvent::ExpiredDiscarded(e) => len_u32(&e.basket_ids),
        }
    }
}

fn len_u32(ids: &[BasketId]) -> u32 {
    u32::try_from(ids.len()).unwrap_or(u32::MAX)
}

impl Event for WarehouseEvent {
    fn event_type(&self) -> &'static str {
        match self {
            WarehouseEvent::DeliveryReceived(_) => "inventory.delivery.received",
            WarehouseEvent::BasketsSold(_) => "inventory.baskets.sold",
            WarehouseEvent::ExpiredDiscarded(_) => "inventory.baskets.discarded",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            WarehouseEvent::DeliveryReceived(e) => e.occurred_at,
            WarehouseEvent::BasketsSold(e) => e.occurred_at,
            WarehouseEvent::ExpiredDiscarded(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Warehouse {
    type Command = WarehouseCommand;
    type Event = WarehouseEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            WarehouseEvent::DeliveryReceived(e) => {
                let first = e.first_basket_id.0;
                self.baskets.extend((0..u64::from(e.quantity)).map(|offset| {
                    Basket::new(BasketId(first + offset), e.expiry_date, e.unit_sale_price)
                }));
                self.next_basket_id = first + u64::from(e.quantity);
            }
            WarehouseEvent::BasketsSold(e) => self.remove(&e.basket_ids),
            WarehouseEvent::ExpiredDiscarded(e) => self.remove(&e.basket_ids),
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            WarehouseCommand::ReceiveDelivery(cmd) => self.handle_receive(cmd),
            WarehouseCommand::SellBaskets(cmd) => self.handle_sell(cmd),
            WarehouseCommand::DiscardExpired(cmd) => self.handle_discard(cmd),
        }
    }
}

impl Warehouse {
    fn remove(&mut self, ids: &[BasketId]) {
        remove_by_id(&mut self.baskets, ids);
    }

    fn handle_receive(&self, cmd: &ReceiveDelivery) -> Result<Vec<WarehouseEvent>, DomainError> {
        if cmd.quantity > MAX_DELIVERY_QUANTITY {
            return Err(DomainError::invalid_quantity(format!(
                "a delivery holds at most {MAX_DELIVERY_QUANTITY} baskets, got {}",
                cmd.quantity
            )));
        }
        let quote = self.pricing.quote(cmd.delivery_price, cmd.quantity)?;

        self.next_basket_id
            .checked_add(u64::from(cmd.quantity))
            .ok_or_else(|| DomainError::arithmetic("basket id space exhausted"))?;

        Ok(vec![WarehouseEvent::DeliveryReceived(DeliveryReceived {
            first_basket_id: BasketId(self.next_basket_id),
            quantity: cmd.quantity,
            delivery_price: cmd.delivery_price,
            unit_cost: quote.unit_cost,
            unit_sale_price: quote.unit_sale_price,
            expiry_date: cmd.expiry_date,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_sell(&self, cmd: &SellBaskets) -> Result<Vec<WarehouseEvent>, DomainError> {
        if cmd.quantity == 0 {
            return Err(DomainError::invalid_quantity("must sell at least one basket"));
        }

        let requested = usize::try_from(cmd.quantity)
            .map_err(|_| DomainError::invalid_quantity("quantity does not fit in memory"))?;
        if requested > self.baskets.len() {
            return Err(DomainError::insufficient_stock(cmd.quantity, self.baskets.len()));
        }

        let selected = self.cheapest(requested);
        let sale_value = Money::checked_sum(selected.iter().map(|b| b.unit_sale_price()))
            .ok_or_else(|| DomainError::arithmetic("sale value overflowed"))?;

        Ok(vec![WarehouseEvent::BasketsSold(BasketsSold {
            basket_ids: selected.iter().map(|b| *b.id()).collect(),
            sale_value,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_discard(&self, cmd: &DiscardExpired) -> Result<Vec<WarehouseEvent>, DomainError> {
        let expired: Vec<&Basket> = self
            .baskets
            .iter()
            .filter(|b| b.is_expired(cmd.today))
            .collect();

        if expired.is_empty() {
            return Ok(vec![]);
        }

        let lost_value = Money::checked_sum(expired.iter().map(|b| b.unit_sale_price()))
            .ok_or_else(|| DomainError::arithmetic("discarded value overflowed"))?;

        Ok(vec![WarehouseEvent::ExpiredDiscarded(ExpiredDiscarded {
            basket_ids: expired.iter().map(|b| *b.id()).collect(),
            lost_value,
            occurred_at: cmd.occurred_at,
        })])
    }
}
