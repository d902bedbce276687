// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use time::Date;

use crate::{
    Customer, CustomerStatus, EntityKind, Invoice, InvoiceStatus, Priority, Record, RecordId,
    TagList, WorkOrder, WorkOrderStatus,
};

const NEW_CUSTOMER_TAG: &str = "New";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerFormInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkOrderFormInput {
    pub title: String,
    pub customer: String,
    pub technician: String,
    pub address: String,
    pub priority: Priority,
    pub scheduled_for: Date,
    pub estimate_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceFormInput {
    pub customer: String,
    pub work_order: Option<RecordId>,
    pub due_in_days: i64,
    pub total_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPayload {
    Customer(CustomerFormInput),
    WorkOrder(WorkOrderFormInput),
    Invoice(InvoiceFormInput),
}

impl FormPayload {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Customer(_) => EntityKind::Customers,
            Self::WorkOrder(_) => EntityKind::WorkOrders,
            Self::Invoice(_) => EntityKind::Invoices,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Customer(customer) => customer.validate(),
            Self::WorkOrder(work_order) => work_order.validate(),
            Self::Invoice(invoice) => invoice.validate(),
        }
    }
}

impl CustomerFormInput {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("customer name is required -- enter a name and retry");
        }
        let email = self.email.trim();
        if !email.is_empty() && !email.contains('@') {
            bail!("customer email {email:?} is missing an @");
        }
        Ok(())
    }
}

impl WorkOrderFormInput {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            bail!("work order title is required -- enter a title and retry");
        }
        if self.customer.trim().is_empty() {
            bail!("work order customer is required -- choose a customer and retry");
        }
        if self.estimate_cents < 0 {
            bail!("work order estimate cannot be negative");
        }
        Ok(())
    }
}

impl InvoiceFormInput {
    pub fn validate(&self) -> Result<()> {
        if self.customer.trim().is_empty() {
            bail!("invoice customer is required -- choose a customer and retry");
        }
        if self.total_cents <= 0 {
            bail!("invoice total must be positive");
        }
        if self.due_in_days < 0 {
            bail!("invoice due date cannot be before the issue date");
        }
        Ok(())
    }
}

/// A record type that can be built from a validated creation form. New
/// records start in the entity's default status.
pub trait Creatable: Record + Sized {
    fn from_form(payload: &FormPayload, id: RecordId, today: Date) -> Result<Self>;
}

fn mismatched(expected: EntityKind, payload: &FormPayload) -> anyhow::Error {
    anyhow::anyhow!(
        "{} form cannot create a {}",
        payload.kind().singular(),
        expected.singular()
    )
}

impl Creatable for Customer {
    fn from_form(payload: &FormPayload, id: RecordId, today: Date) -> Result<Self> {
        let FormPayload::Customer(form) = payload else {
            return Err(mismatched(EntityKind::Customers, payload));
        };
        form.validate()?;
        Ok(Self {
            id,
            name: form.name.trim().to_owned(),
            email: form.email.trim().to_owned(),
            phone: form.phone.trim().to_owned(),
            company: form.company.trim().to_owned(),
            address: form.address.trim().to_owned(),
            status: CustomerStatus::Active,
            tags: [NEW_CUSTOMER_TAG].into_iter().collect::<TagList>(),
            total_jobs: 0,
            lifetime_value_cents: 0,
            customer_since: today,
        })
    }
}

impl Creatable for WorkOrder {
    fn from_form(payload: &FormPayload, id: RecordId, _today: Date) -> Result<Self> {
        let FormPayload::WorkOrder(form) = payload else {
            return Err(mismatched(EntityKind::WorkOrders, payload));
        };
        form.validate()?;
        Ok(Self {
            id,
            title: form.title.trim().to_owned(),
            customer: form.customer.trim().to_owned(),
            technician: form.technician.trim().to_owned(),
            address: form.address.trim().to_owned(),
            priority: form.priority,
            scheduled_for: form.scheduled_for,
            estimate_cents: form.estimate_cents,
            status: WorkOrderStatus::Pending,
            tags: TagList::new(),
        })
    }
}

impl Creatable for Invoice {
    fn from_form(payload: &FormPayload, id: RecordId, today: Date) -> Result<Self> {
        let FormPayload::Invoice(form) = payload else {
            return Err(mismatched(EntityKind::Invoices, payload));
        };
        form.validate()?;
        let due_on = today
            .checked_add(time::Duration::days(form.due_in_days))
            .ok_or_else(|| anyhow::anyhow!("invoice due date is out of range"))?;
        Ok(Self {
            id,
            customer: form.customer.trim().to_owned(),
            work_order: form.work_order.clone(),
            issued_on: today,
            due_on,
            total_cents: form.total_cents,
            status: InvoiceStatus::Draft,
            tags: TagList::new(),
        })
    }
}
