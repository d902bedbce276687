// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use fieldops_app::{
    CUSTOMER_TAGS, Customer, CustomerFormInput, CustomerStatus, EntityKind, FormPayload,
    INVOICE_TAGS, Invoice, InvoiceFormInput, InvoiceStatus, Priority, RecordId, TagCatalog,
    TagList, WORK_ORDER_TAGS, WorkOrder, WorkOrderFormInput, WorkOrderStatus,
};
use time::{Date, Duration, Month};

const REFERENCE_YEAR: i32 = 2026;

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];
const STREET_NAMES: [&str; 12] = [
    "Cedar", "Maple", "Oak", "Pine", "Willow", "Elm", "Birch", "Juniper", "Sunset", "Ridge",
    "Lakeview", "Hillcrest",
];
const CITIES: [&str; 8] = [
    "Austin",
    "Denver",
    "Raleigh",
    "Portland",
    "Boise",
    "Phoenix",
    "Nashville",
    "Columbus",
];
const COMPANY_WORDS: [&str; 10] = [
    "Summit", "Harbor", "Granite", "Cedar", "Beacon", "Pioneer", "Northgate", "Riverside",
    "Keystone", "Oakline",
];
const COMPANY_KINDS: [&str; 6] = [
    "Properties",
    "Dental",
    "Bakery",
    "Realty",
    "Fitness",
    "Holdings",
];
const EMAIL_DOMAINS: [&str; 4] = ["example.com", "mail.test", "homeowner.net", "inbox.local"];

const JOB_TITLES: [&str; 14] = [
    "AC not cooling",
    "Furnace tune-up",
    "Water heater replacement",
    "Leaking kitchen faucet",
    "Panel upgrade",
    "Install ceiling fan",
    "Clogged main drain",
    "Thermostat install",
    "Duct cleaning",
    "Sump pump check",
    "GFCI outlets tripping",
    "Garbage disposal swap",
    "Annual HVAC service",
    "Toilet running constantly",
];

const TECHNICIANS: [&str; 6] = [
    "Sam Ortega",
    "Lee Nakamura",
    "Dana Whitfield",
    "Chris Okafor",
    "Pat Lindqvist",
    "Unassigned",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Record counts for one seeded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedCounts {
    pub customers: usize,
    pub work_orders: usize,
    pub invoices: usize,
}

impl Default for SeedCounts {
    fn default() -> Self {
        Self {
            customers: 25,
            work_orders: 40,
            invoices: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedData {
    pub customers: Vec<Customer>,
    pub work_orders: Vec<WorkOrder>,
    pub invoices: Vec<Invoice>,
}

/// Reproducible mock data for every entity table. Equal seeds produce equal
/// datasets.
#[derive(Debug, Clone)]
pub struct FieldFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl FieldFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    /// Customers first, then work orders for those customers, then invoices
    /// for those work orders.
    pub fn dataset(&mut self, counts: SeedCounts) -> SeedData {
        let customers = self.customers(counts.customers);
        let work_orders = self.work_orders(counts.work_orders, &customers);
        let invoices = self.invoices(counts.invoices, &work_orders);
        SeedData {
            customers,
            work_orders,
            invoices,
        }
    }

    pub fn customers(&mut self, count: usize) -> Vec<Customer> {
        (1..=count).map(|seq| self.customer(seq as u32)).collect()
    }

    pub fn customer(&mut self, sequence: u32) -> Customer {
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        let status = CustomerStatus::ALL[self.rng.int_n(CustomerStatus::ALL.len())];
        let mut tags = self.tags(&CUSTOMER_TAGS, 2);
        if status == CustomerStatus::Vip {
            tags.insert("VIP");
        }
        let company = if self.rng.bool() {
            format!("{} {}", self.pick(&COMPANY_WORDS), self.pick(&COMPANY_KINDS))
        } else {
            String::new()
        };
        let total_jobs = if status == CustomerStatus::Lead {
            0
        } else {
            self.int_range_i64(1, 40) as u32
        };
        Customer {
            id: RecordId::minted(EntityKind::Customers.id_prefix(), sequence),
            name: format!("{first} {last}"),
            email: format!(
                "{}.{}@{}",
                first.to_ascii_lowercase(),
                last.to_ascii_lowercase(),
                self.pick(&EMAIL_DOMAINS)
            ),
            phone: self.phone(),
            company,
            address: self.address(),
            status,
            tags,
            total_jobs,
            lifetime_value_cents: i64::from(total_jobs) * self.int_range_i64(15_000, 90_000),
            customer_since: self.date_within(-1_500, -30),
        }
    }

    pub fn work_orders(&mut self, count: usize, customers: &[Customer]) -> Vec<WorkOrder> {
        (1..=count)
            .map(|seq| self.work_order(seq as u32, customers))
            .collect()
    }

    /// Draws the customer from `customers`, or invents one when the slice is
    /// empty.
    pub fn work_order(&mut self, sequence: u32, customers: &[Customer]) -> WorkOrder {
        let (customer, address) = match customers.get(self.rng.int_n(customers.len())) {
            Some(customer) => (customer.name.clone(), customer.address.clone()),
            None => (self.full_name(), self.address()),
        };
        let status = WorkOrderStatus::ALL[self.rng.int_n(WorkOrderStatus::ALL.len())];
        let priority = Priority::ALL[self.rng.int_n(Priority::ALL.len())];
        let mut tags = self.tags(&WORK_ORDER_TAGS, 2);
        if priority == Priority::Urgent {
            tags.insert("Urgent");
        }
        WorkOrder {
            id: RecordId::minted(EntityKind::WorkOrders.id_prefix(), sequence),
            title: self.pick(&JOB_TITLES).to_owned(),
            customer,
            technician: self.pick(&TECHNICIANS).to_owned(),
            address,
            priority,
            scheduled_for: self.date_within(-30, 30),
            estimate_cents: self.int_range_i64(75, 4_500) * 100,
            status,
            tags,
        }
    }

    pub fn invoices(&mut self, count: usize, work_orders: &[WorkOrder]) -> Vec<Invoice> {
        (1..=count)
            .map(|seq| self.invoice(seq as u32, work_orders))
            .collect()
    }

    pub fn invoice(&mut self, sequence: u32, work_orders: &[WorkOrder]) -> Invoice {
        let (customer, work_order, total_cents) =
            match work_orders.get(self.rng.int_n(work_orders.len())) {
                Some(order) => (
                    order.customer.clone(),
                    Some(order.id.clone()),
                    order.estimate_cents,
                ),
                None => (self.full_name(), None, self.int_range_i64(75, 4_500) * 100),
            };
        let status = InvoiceStatus::ALL[self.rng.int_n(InvoiceStatus::ALL.len())];
        let issued_on = self.date_within(-90, 0);
        let due_on = issued_on + Duration::days(30);
        Invoice {
            id: RecordId::minted(EntityKind::Invoices.id_prefix(), sequence),
            customer,
            work_order,
            issued_on,
            due_on,
            total_cents,
            status,
            tags: self.tags(&INVOICE_TAGS, 1),
        }
    }

    /// A filled-in creation form for `entity`, as a user would submit it.
    pub fn form_draft(&mut self, entity: EntityKind) -> FormPayload {
        match entity {
            EntityKind::Customers => {
                let first = self.pick(&FIRST_NAMES);
                let last = self.pick(&LAST_NAMES);
                FormPayload::Customer(CustomerFormInput {
                    name: format!("{first} {last}"),
                    email: format!(
                        "{}@{}",
                        first.to_ascii_lowercase(),
                        self.pick(&EMAIL_DOMAINS)
                    ),
                    phone: self.phone(),
                    company: String::new(),
                    address: self.address(),
                })
            }
            EntityKind::WorkOrders => FormPayload::WorkOrder(WorkOrderFormInput {
                title: self.pick(&JOB_TITLES).to_owned(),
                customer: self.full_name(),
                technician: self.pick(&TECHNICIANS).to_owned(),
                address: self.address(),
                priority: Priority::ALL[self.rng.int_n(Priority::ALL.len())],
                scheduled_for: self.date_within(1, 14),
                estimate_cents: self.int_range_i64(75, 4_500) * 100,
            }),
            EntityKind::Invoices => FormPayload::Invoice(InvoiceFormInput {
                customer: self.full_name(),
                work_order: None,
                due_in_days: 30,
                total_cents: self.int_range_i64(75, 4_500) * 100,
            }),
        }
    }

    fn full_name(&mut self) -> String {
        format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES))
    }

    fn phone(&mut self) -> String {
        format!(
            "({:03}) {:03}-{:04}",
            self.int_range_i64(200, 999),
            self.int_range_i64(200, 999),
            self.int_range_i64(0, 9_999),
        )
    }

    fn address(&mut self) -> String {
        format!(
            "{} {} St, {}",
            self.int_range_i64(100, 9_999),
            self.pick(&STREET_NAMES),
            self.pick(&CITIES)
        )
    }

    /// Up to `max` distinct labels from `catalog`, in catalog order.
    fn tags(&mut self, catalog: &TagCatalog, max: usize) -> TagList {
        let wanted = self.rng.int_n(max + 1);
        let mut tags = TagList::new();
        for _ in 0..wanted {
            let entries = catalog.entries();
            if let Some(def) = entries.get(self.rng.int_n(entries.len())) {
                tags.insert(def.label);
            }
        }
        tags
    }

    fn date_within(&mut self, min_days: i64, max_days: i64) -> Date {
        reference_date() + Duration::days(self.int_range_i64(min_days, max_days))
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range_i64(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }
}

/// Fixed "today" the generated dates are anchored to.
pub fn reference_date() -> Date {
    Date::from_calendar_date(REFERENCE_YEAR, Month::January, 15).expect("valid calendar date")
}

#[cfg(test)]
mod tests {
    use super::{FieldFaker, SeedCounts, reference_date};
    use fieldops_app::{
        CUSTOMER_TAGS, CustomerStatus, EntityKind, FormPayload, Record, RecordId,
    };
    use std::collections::BTreeSet;

    #[test]
    fn equal_seeds_give_equal_datasets() {
        let left = FieldFaker::new(42).dataset(SeedCounts::default());
        let right = FieldFaker::new(42).dataset(SeedCounts::default());
        assert_eq!(left, right);
    }

    #[test]
    fn zero_seed_is_normalized() {
        assert_eq!(FieldFaker::new(0).seed(), 1);
    }

    #[test]
    fn ids_are_sequential_per_entity() {
        let data = FieldFaker::new(7).dataset(SeedCounts {
            customers: 3,
            work_orders: 2,
            invoices: 2,
        });
        let ids = data
            .customers
            .iter()
            .map(|customer| customer.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["CUS-0001", "CUS-0002", "CUS-0003"]);
        assert_eq!(data.work_orders[1].id, RecordId::new("WO-0002"));
        assert_eq!(data.invoices[0].id, RecordId::new("INV-0001"));
    }

    #[test]
    fn work_orders_reference_seeded_customers() {
        let data = FieldFaker::new(3).dataset(SeedCounts::default());
        let names = data
            .customers
            .iter()
            .map(|customer| customer.name.as_str())
            .collect::<BTreeSet<_>>();
        assert!(
            data.work_orders
                .iter()
                .all(|order| names.contains(order.customer.as_str()))
        );
        assert!(data.invoices.iter().all(|invoice| invoice.work_order.is_some()));
    }

    #[test]
    fn vip_customers_carry_the_vip_tag_and_tags_are_known() {
        let customers = FieldFaker::new(11).customers(60);
        for customer in &customers {
            if customer.status == CustomerStatus::Vip {
                assert!(customer.tags.contains("VIP"), "{}", customer.id);
            }
            assert!(customer.tags.iter().all(|tag| CUSTOMER_TAGS.is_known(tag)));
        }
    }

    #[test]
    fn every_status_shows_up_in_a_large_sample() {
        let customers = FieldFaker::new(5).customers(200);
        let seen = customers
            .iter()
            .map(|customer| customer.status())
            .collect::<Vec<_>>();
        for status in CustomerStatus::ALL {
            assert!(seen.contains(&status), "missing {status:?}");
        }
    }

    #[test]
    fn form_drafts_validate_and_match_the_entity() {
        let mut faker = FieldFaker::new(9);
        for entity in EntityKind::ALL {
            let draft = faker.form_draft(entity);
            assert_eq!(draft.kind(), entity);
            assert!(draft.validate().is_ok(), "{entity:?}");
        }
        assert!(matches!(
            faker.form_draft(EntityKind::Invoices),
            FormPayload::Invoice(_)
        ));
    }

    #[test]
    fn dates_stay_near_the_reference_day() {
        let mut faker = FieldFaker::new(13);
        for order in faker.work_orders(50, &[]) {
            let offset = (order.scheduled_for - reference_date()).whole_days();
            assert!((-30..=30).contains(&offset));
        }
    }

    #[test]
    fn variety_across_seeds() {
        let mut names = BTreeSet::new();
        for seed in 0_u64..20_u64 {
            names.insert(FieldFaker::new(seed).customer(1).name);
        }
        assert!(names.len() >= 10, "got {}", names.len());
    }
}
