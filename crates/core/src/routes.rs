// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Static mapping from event names to cache keys.
//!
//! Each [`RouteEntry`] lists the collection keys to invalidate in bulk and,
//! optionally, a detail key that is invalidated for the single entity named
//! in the payload. The table is fixed at compile time.

use std::fmt;

use serde::Serialize;

use crate::protocol::EventEnvelope;

/// A logical cache key, e.g. `["products"]` or `["product", "p-1"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    /// Key for a whole collection.
    pub fn collection(name: &str) -> Self {
        QueryKey(vec![name.to_string()])
    }

    /// Key for one entity within a detail namespace.
    pub fn detail(name: &str, id: impl Into<String>) -> Self {
        QueryKey(vec![name.to_string(), id.into()])
    }

    /// The key's segments in order.
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(":"))
    }
}

/// Single-entity invalidation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DetailKey {
    /// Detail namespace, e.g. `product`.
    pub key: &'static str,
    /// Payload field naming the parent entity, checked before `id`.
    ///
    /// Set for dependent resources (reviews, stock levels) whose change
    /// should refresh the parent's detail view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<&'static str>,
}

impl DetailKey {
    const fn own(key: &'static str) -> Self {
        DetailKey {
            key,
            foreign_key: None,
        }
    }

    const fn parent(key: &'static str, foreign_key: &'static str) -> Self {
        DetailKey {
            key,
            foreign_key: Some(foreign_key),
        }
    }

    /// Resolves the entity id from an envelope's payload.
    pub fn entity_id(&self, envelope: &EventEnvelope) -> Option<String> {
        self.foreign_key
            .and_then(|field| envelope.payload_id(field))
            .or_else(|| envelope.payload_id("id"))
    }

    /// Builds the detail key for an envelope, if its payload names an entity.
    pub fn resolve(&self, envelope: &EventEnvelope) -> Option<QueryKey> {
        self.entity_id(envelope)
            .map(|id| QueryKey::detail(self.key, id))
    }
}

/// User-facing notices attached to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    OrderCreated,
    OrderUpdated,
}

/// One row of the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    /// Event name this row matches.
    pub event: &'static str,
    /// Collection keys invalidated on every match.
    pub collections: &'static [&'static str],
    /// Optional single-entity key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<DetailKey>,
    /// Optional user-facing notice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl RouteEntry {
    const fn bulk(event: &'static str, collections: &'static [&'static str]) -> Self {
        RouteEntry {
            event,
            collections,
            detail: None,
            notice: None,
        }
    }

    const fn with_detail(mut self, detail: DetailKey) -> Self {
        self.detail = Some(detail);
        self
    }

    const fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }

    /// All keys this entry invalidates for the given envelope.
    ///
    /// Collection keys come first, followed by the detail key when the
    /// payload carries an id.
    pub fn keys_for(&self, envelope: &EventEnvelope) -> Vec<QueryKey> {
        let mut keys: Vec<QueryKey> = self
            .collections
            .iter()
            .map(|name| QueryKey::collection(name))
            .collect();
        if let Some(key) = self.detail.and_then(|d| d.resolve(envelope)) {
            keys.push(key);
        }
        keys
    }
}

const PRODUCT: DetailKey = DetailKey::own("product");
const PRODUCT_OF: DetailKey = DetailKey::parent("product", "productId");
const CATEGORY: DetailKey = DetailKey::own("category");
const COLLECTION: DetailKey = DetailKey::own("collection");
const BRAND: DetailKey = DetailKey::own("brand");
const ORDER: DetailKey = DetailKey::own("order");
const CAMPAIGN: DetailKey = DetailKey::own("campaign");

/// Broadcast sent by the backend when storewide discounts change.
pub const DISCOUNT_BROADCAST: &str = "DISCOUNT_UPDATED";

/// The route table.
pub static ROUTES: &[RouteEntry] = &[
    RouteEntry::bulk("product.created", &["products"]).with_detail(PRODUCT),
    RouteEntry::bulk("product.updated", &["products"]).with_detail(PRODUCT),
    RouteEntry::bulk("product.deleted", &["products"]).with_detail(PRODUCT),
    RouteEntry::bulk("category.created", &["categories"]).with_detail(CATEGORY),
    RouteEntry::bulk("category.updated", &["categories"]).with_detail(CATEGORY),
    RouteEntry::bulk("category.deleted", &["categories"]).with_detail(CATEGORY),
    RouteEntry::bulk("collection.created", &["collections"]).with_detail(COLLECTION),
    RouteEntry::bulk("collection.updated", &["collections"]).with_detail(COLLECTION),
    RouteEntry::bulk("collection.deleted", &["collections"]).with_detail(COLLECTION),
    RouteEntry::bulk("media.created", &["media"]),
    RouteEntry::bulk("media.updated", &["media"]),
    RouteEntry::bulk("media.deleted", &["media"]),
    RouteEntry::bulk("brand.created", &["brands"]).with_detail(BRAND),
    RouteEntry::bulk("brand.updated", &["brands"]).with_detail(BRAND),
    RouteEntry::bulk("brand.deleted", &["brands"]).with_detail(BRAND),
    RouteEntry::bulk("order.created", &["orders"])
        .with_detail(ORDER)
        .with_notice(Notice::OrderCreated),
    RouteEntry::bulk("order.updated", &["orders"])
        .with_detail(ORDER)
        .with_notice(Notice::OrderUpdated),
    RouteEntry::bulk("order.deleted", &["orders"]).with_detail(ORDER),
    RouteEntry::bulk("inventory.updated", &["inventory", "products"]).with_detail(PRODUCT_OF),
    RouteEntry::bulk("settings.updated", &["settings"]),
    RouteEntry::bulk(DISCOUNT_BROADCAST, &["discounts", "products"]),
    RouteEntry::bulk("review.created", &["reviews"]).with_detail(PRODUCT_OF),
    RouteEntry::bulk("review.deleted", &["reviews"]).with_detail(PRODUCT_OF),
    RouteEntry::bulk("campaign.updated", &["campaigns"]).with_detail(CAMPAIGN),
    RouteEntry::bulk("user.updated", &["users", "profile"]),
    RouteEntry::bulk("profile.updated", &["profile"]),
];

/// Looks up the route for an event name.
pub fn route_for(event: &str) -> Option<&'static RouteEntry> {
    ROUTES.iter().find(|entry| entry.event == event)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
