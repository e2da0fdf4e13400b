//! # In-Memory Repositories
//!
//! `RwLock<HashMap>`-backed implementations of the `stay-core` repository
//! traits. Used by the server (seeded from `config/properties.toml`) and by
//! handler tests. A SQL-backed implementation would replace this behind the
//! same traits.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::NaiveDate;
use stay_core::{
    AvailabilityOverride, Booking, BookingRepo, BookingResult, Customer, CustomerRepo, DateSpan,
    ExtraService, OverrideRepo, Property, PropertyCatalog, PropertyRepo, ServiceRepo,
};

/// All repositories in one store
#[derive(Default)]
pub struct MemoryStore {
    properties: RwLock<HashMap<String, Property>>,
    overrides: RwLock<HashMap<(String, NaiveDate), AvailabilityOverride>>,
    bookings: RwLock<HashMap<String, Booking>>,
    customers: RwLock<HashMap<String, Customer>>,
    services: RwLock<HashMap<String, ExtraService>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed properties and services from a loaded catalog
    pub fn seed_catalog(&self, catalog: &PropertyCatalog) {
        let mut properties = self.properties.write().unwrap();
        for property in &catalog.properties {
            properties.insert(property.id.clone(), property.clone());
        }
        let mut services = self.services.write().unwrap();
        for service in &catalog.services {
            services.insert(service.id.clone(), service.clone());
        }
    }

    pub fn property_count(&self) -> usize {
        self.properties.read().unwrap().len()
    }
}

impl PropertyRepo for MemoryStore {
    fn find_property(&self, property_id: &str) -> BookingResult<Option<Property>> {
        Ok(self.properties.read().unwrap().get(property_id).cloned())
    }

    fn list_active(&self) -> BookingResult<Vec<Property>> {
        let mut properties: Vec<_> = self
            .properties
            .read()
            .unwrap()
            .values()
            .filter(|p| p.active)
            .cloned()
            .collect();
        properties.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(properties)
    }
}

impl OverrideRepo for MemoryStore {
    fn find_override(
        &self,
        property_id: &str,
        date: NaiveDate,
    ) -> BookingResult<Option<AvailabilityOverride>> {
        Ok(self
            .overrides
            .read()
            .unwrap()
            .get(&(property_id.to_string(), date))
            .cloned())
    }

    fn overrides_in_window(
        &self,
        property_id: &str,
        window: DateSpan,
    ) -> BookingResult<Vec<AvailabilityOverride>> {
        Ok(self
            .overrides
            .read()
            .unwrap()
            .values()
            .filter(|o| o.property_id == property_id && window.contains(o.date))
            .cloned()
            .collect())
    }

    fn upsert_override(&self, ovr: AvailabilityOverride) -> BookingResult<()> {
        self.overrides
            .write()
            .unwrap()
            .insert((ovr.property_id.clone(), ovr.date), ovr);
        Ok(())
    }
}

impl BookingRepo for MemoryStore {
    fn find_booking(&self, booking_id: &str) -> BookingResult<Option<Booking>> {
        Ok(self.bookings.read().unwrap().get(booking_id).cloned())
    }

    fn bookings_in_window(
        &self,
        property_id: &str,
        window: DateSpan,
    ) -> BookingResult<Vec<Booking>> {
        Ok(self
            .bookings
            .read()
            .unwrap()
            .values()
            .filter(|b| b.property_id == property_id && b.span.overlaps(&window))
            .cloned()
            .collect())
    }

    fn bookings_for_property(&self, property_id: &str) -> BookingResult<Vec<Booking>> {
        Ok(self
            .bookings
            .read()
            .unwrap()
            .values()
            .filter(|b| b.property_id == property_id)
            .cloned()
            .collect())
    }

    fn find_by_transaction(&self, transaction_id: &str) -> BookingResult<Option<Booking>> {
        Ok(self
            .bookings
            .read()
            .unwrap()
            .values()
            .find(|b| b.transaction_id.as_deref() == Some(transaction_id))
            .cloned())
    }

    fn insert_booking(&self, booking: Booking) -> BookingResult<()> {
        self.bookings
            .write()
            .unwrap()
            .insert(booking.id.clone(), booking);
        Ok(())
    }

    fn update_booking(&self, booking: &Booking) -> BookingResult<()> {
        self.bookings
            .write()
            .unwrap()
            .insert(booking.id.clone(), booking.clone());
        Ok(())
    }

    fn open_bookings(&self) -> BookingResult<Vec<Booking>> {
        Ok(self
            .bookings
            .read()
            .unwrap()
            .values()
            .filter(|b| !b.status.is_terminal())
            .cloned()
            .collect())
    }
}

impl CustomerRepo for MemoryStore {
    fn find_customer(&self, customer_id: &str) -> BookingResult<Option<Customer>> {
        Ok(self.customers.read().unwrap().get(customer_id).cloned())
    }

    fn find_by_email(&self, email: &str) -> BookingResult<Option<Customer>> {
        Ok(self
            .customers
            .read()
            .unwrap()
            .values()
            .find(|c| c.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn find_or_create(&self, customer: Customer) -> BookingResult<Customer> {
        let mut customers = self.customers.write().unwrap();
        if let Some(existing) = customers
            .values()
            .find(|c| c.email.eq_ignore_ascii_case(&customer.email))
        {
            return Ok(existing.clone());
        }
        customers.insert(customer.id.clone(), customer.clone());
        Ok(customer)
    }

    fn list_customers(&self) -> BookingResult<Vec<Customer>> {
        Ok(self.customers.read().unwrap().values().cloned().collect())
    }
}

impl ServiceRepo for MemoryStore {
    fn services_for_property(&self, property_id: &str) -> BookingResult<Vec<ExtraService>> {
        Ok(self
            .services
            .read()
            .unwrap()
            .values()
            .filter(|s| s.property_id == property_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_seed_and_lookup() {
        let store = MemoryStore::new();
        let catalog = PropertyCatalog {
            properties: vec![Property::new("villa-aurora", "Villa Aurora", dec!(100))],
            services: vec![ExtraService::new(
                "cleaning",
                "villa-aurora",
                "Final cleaning",
                dec!(45),
            )],
        };
        store.seed_catalog(&catalog);

        assert!(store.find_property("villa-aurora").unwrap().is_some());
        assert_eq!(store.services_for_property("villa-aurora").unwrap().len(), 1);
    }

    #[test]
    fn test_find_or_create_by_email_is_unique() {
        let store = MemoryStore::new();
        let first = store
            .find_or_create(Customer::new("jane@example.com", "Jane", "Doe"))
            .unwrap();
        let second = store
            .find_or_create(Customer::new("JANE@example.com", "Janet", "Doe"))
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(store.list_customers().unwrap().len(), 1);
    }

    #[test]
    fn test_booking_transaction_lookup() {
        let store = MemoryStore::new();
        let mut booking = Booking::new(
            "villa-aurora",
            "cust-1",
            DateSpan::new(d("2024-06-01"), d("2024-06-04")).unwrap(),
            2,
            dec!(300.00),
        );
        booking.transaction_id = Some("TX-1".into());
        store.insert_booking(booking.clone()).unwrap();

        let found = store.find_by_transaction("TX-1").unwrap().unwrap();
        assert_eq!(found.id, booking.id);
        assert!(store.find_by_transaction("TX-9").unwrap().is_none());
    }

    #[test]
    fn test_override_window_query() {
        let store = MemoryStore::new();
        store
            .upsert_override(AvailabilityOverride::new(
                "villa-aurora",
                d("2024-06-02"),
                stay_core::OverrideStatus::Blocked,
            ))
            .unwrap();
        store
            .upsert_override(AvailabilityOverride::new(
                "villa-aurora",
                d("2024-07-02"),
                stay_core::OverrideStatus::Blocked,
            ))
            .unwrap();

        let window = DateSpan::new(d("2024-06-01"), d("2024-06-10")).unwrap();
        let found = store.overrides_in_window("villa-aurora", window).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].date, d("2024-06-02"));
    }
}
