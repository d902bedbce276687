// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use time::Date;

use crate::record::digits_only;
use crate::{
    Record, RecordId, StatusCatalog, StatusDef, StatusKey, TagCatalog, TagDef, TagList, Tone,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Customers,
    WorkOrders,
    Invoices,
}

impl EntityKind {
    pub const ALL: [Self; 3] = [Self::Customers, Self::WorkOrders, Self::Invoices];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::WorkOrders => "work_orders",
            Self::Invoices => "invoices",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "customers" => Some(Self::Customers),
            "work_orders" | "work-orders" => Some(Self::WorkOrders),
            "invoices" => Some(Self::Invoices),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::WorkOrders => "work orders",
            Self::Invoices => "invoices",
        }
    }

    pub const fn singular(self) -> &'static str {
        match self {
            Self::Customers => "customer",
            Self::WorkOrders => "work order",
            Self::Invoices => "invoice",
        }
    }

    pub const fn id_prefix(self) -> &'static str {
        match self {
            Self::Customers => "CUS",
            Self::WorkOrders => "WO",
            Self::Invoices => "INV",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    Active,
    Inactive,
    Vip,
    Lead,
}

impl CustomerStatus {
    pub const ALL: [Self; 4] = [Self::Active, Self::Inactive, Self::Vip, Self::Lead];
}

pub static CUSTOMER_STATUSES: StatusCatalog<CustomerStatus> = StatusCatalog::new(&[
    StatusDef {
        key: CustomerStatus::Active,
        label: "Active",
        tone: Tone::Success,
    },
    StatusDef {
        key: CustomerStatus::Vip,
        label: "VIP",
        tone: Tone::Accent,
    },
    StatusDef {
        key: CustomerStatus::Lead,
        label: "Lead",
        tone: Tone::Info,
    },
    StatusDef {
        key: CustomerStatus::Inactive,
        label: "Inactive",
        tone: Tone::Neutral,
    },
]);

impl StatusKey for CustomerStatus {
    fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Vip => "vip",
            Self::Lead => "lead",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "vip" => Some(Self::Vip),
            "lead" => Some(Self::Lead),
            _ => None,
        }
    }

    fn catalog() -> &'static StatusCatalog<Self> {
        &CUSTOMER_STATUSES
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatus {
    Pending,
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl WorkOrderStatus {
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Scheduled,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];
}

pub static WORK_ORDER_STATUSES: StatusCatalog<WorkOrderStatus> = StatusCatalog::new(&[
    StatusDef {
        key: WorkOrderStatus::Pending,
        label: "Pending",
        tone: Tone::Warning,
    },
    StatusDef {
        key: WorkOrderStatus::Scheduled,
        label: "Scheduled",
        tone: Tone::Info,
    },
    StatusDef {
        key: WorkOrderStatus::InProgress,
        label: "In Progress",
        tone: Tone::Accent,
    },
    StatusDef {
        key: WorkOrderStatus::Completed,
        label: "Completed",
        tone: Tone::Success,
    },
    StatusDef {
        key: WorkOrderStatus::Cancelled,
        label: "Cancelled",
        tone: Tone::Danger,
    },
]);

impl StatusKey for WorkOrderStatus {
    fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "scheduled" => Some(Self::Scheduled),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    fn catalog() -> &'static StatusCatalog<Self> {
        &WORK_ORDER_STATUSES
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Void,
}

impl InvoiceStatus {
    pub const ALL: [Self; 5] = [
        Self::Draft,
        Self::Sent,
        Self::Paid,
        Self::Overdue,
        Self::Void,
    ];
}

pub static INVOICE_STATUSES: StatusCatalog<InvoiceStatus> = StatusCatalog::new(&[
    StatusDef {
        key: InvoiceStatus::Draft,
        label: "Draft",
        tone: Tone::Neutral,
    },
    StatusDef {
        key: InvoiceStatus::Sent,
        label: "Sent",
        tone: Tone::Info,
    },
    StatusDef {
        key: InvoiceStatus::Paid,
        label: "Paid",
        tone: Tone::Success,
    },
    StatusDef {
        key: InvoiceStatus::Overdue,
        label: "Overdue",
        tone: Tone::Danger,
    },
    StatusDef {
        key: InvoiceStatus::Void,
        label: "Void",
        tone: Tone::Neutral,
    },
]);

impl StatusKey for InvoiceStatus {
    fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
            Self::Void => "void",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "sent" => Some(Self::Sent),
            "paid" => Some(Self::Paid),
            "overdue" => Some(Self::Overdue),
            "void" => Some(Self::Void),
            _ => None,
        }
    }

    fn catalog() -> &'static StatusCatalog<Self> {
        &INVOICE_STATUSES
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "urgent" => Some(Self::Urgent),
            _ => None,
        }
    }
}

pub static CUSTOMER_TAGS: TagCatalog = TagCatalog::new(&[
    TagDef {
        id: "vip",
        label: "VIP",
        tone: Tone::Accent,
    },
    TagDef {
        id: "priority",
        label: "Priority",
        tone: Tone::Danger,
    },
    TagDef {
        id: "commercial",
        label: "Commercial",
        tone: Tone::Info,
    },
    TagDef {
        id: "residential",
        label: "Residential",
        tone: Tone::Success,
    },
    TagDef {
        id: "follow-up",
        label: "Follow Up",
        tone: Tone::Warning,
    },
    TagDef {
        id: "new",
        label: "New",
        tone: Tone::Info,
    },
]);

pub static WORK_ORDER_TAGS: TagCatalog = TagCatalog::new(&[
    TagDef {
        id: "urgent",
        label: "Urgent",
        tone: Tone::Danger,
    },
    TagDef {
        id: "warranty",
        label: "Warranty",
        tone: Tone::Info,
    },
    TagDef {
        id: "callback",
        label: "Callback",
        tone: Tone::Warning,
    },
    TagDef {
        id: "parts-needed",
        label: "Parts Needed",
        tone: Tone::Warning,
    },
    TagDef {
        id: "after-hours",
        label: "After Hours",
        tone: Tone::Accent,
    },
]);

pub static INVOICE_TAGS: TagCatalog = TagCatalog::new(&[
    TagDef {
        id: "disputed",
        label: "Disputed",
        tone: Tone::Danger,
    },
    TagDef {
        id: "partial-payment",
        label: "Partial Payment",
        tone: Tone::Warning,
    },
    TagDef {
        id: "net-30",
        label: "Net 30",
        tone: Tone::Info,
    },
    TagDef {
        id: "reminder-sent",
        label: "Reminder Sent",
        tone: Tone::Neutral,
    },
]);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub address: String,
    pub status: CustomerStatus,
    pub tags: TagList,
    pub total_jobs: u32,
    pub lifetime_value_cents: i64,
    pub customer_since: Date,
}

impl Record for Customer {
    type Status = CustomerStatus;

    const ENTITY: EntityKind = EntityKind::Customers;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn status(&self) -> CustomerStatus {
        self.status
    }

    fn set_status(&mut self, status: CustomerStatus) {
        self.status = status;
    }

    fn tags(&self) -> &TagList {
        &self.tags
    }

    fn tags_mut(&mut self) -> &mut TagList {
        &mut self.tags
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.name.as_str()),
            Cow::Borrowed(self.email.as_str()),
            Cow::Borrowed(self.phone.as_str()),
            Cow::Owned(digits_only(&self.phone)),
            Cow::Borrowed(self.company.as_str()),
        ]
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn tag_catalog() -> &'static TagCatalog {
        &CUSTOMER_TAGS
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: RecordId,
    pub title: String,
    pub customer: String,
    pub technician: String,
    pub address: String,
    pub priority: Priority,
    pub scheduled_for: Date,
    pub estimate_cents: i64,
    pub status: WorkOrderStatus,
    pub tags: TagList,
}

impl Record for WorkOrder {
    type Status = WorkOrderStatus;

    const ENTITY: EntityKind = EntityKind::WorkOrders;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn status(&self) -> WorkOrderStatus {
        self.status
    }

    fn set_status(&mut self, status: WorkOrderStatus) {
        self.status = status;
    }

    fn tags(&self) -> &TagList {
        &self.tags
    }

    fn tags_mut(&mut self) -> &mut TagList {
        &mut self.tags
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.id.as_str()),
            Cow::Borrowed(self.title.as_str()),
            Cow::Borrowed(self.customer.as_str()),
            Cow::Borrowed(self.technician.as_str()),
            Cow::Borrowed(self.address.as_str()),
        ]
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn tag_catalog() -> &'static TagCatalog {
        &WORK_ORDER_TAGS
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: RecordId,
    pub customer: String,
    pub work_order: Option<RecordId>,
    pub issued_on: Date,
    pub due_on: Date,
    pub total_cents: i64,
    pub status: InvoiceStatus,
    pub tags: TagList,
}

impl Record for Invoice {
    type Status = InvoiceStatus;

    const ENTITY: EntityKind = EntityKind::Invoices;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn status(&self) -> InvoiceStatus {
        self.status
    }

    fn set_status(&mut self, status: InvoiceStatus) {
        self.status = status;
    }

    fn tags(&self) -> &TagList {
        &self.tags
    }

    fn tags_mut(&mut self) -> &mut TagList {
        &mut self.tags
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        let mut fields = vec![
            Cow::Borrowed(self.id.as_str()),
            Cow::Borrowed(self.customer.as_str()),
        ];
        if let Some(work_order) = &self.work_order {
            fields.push(Cow::Borrowed(work_order.as_str()));
        }
        fields
    }

    fn display_name(&self) -> &str {
        self.id.as_str()
    }

    fn tag_catalog() -> &'static TagCatalog {
        &INVOICE_TAGS
    }
}
