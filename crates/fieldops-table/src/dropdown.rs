// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use fieldops_app::RecordId;
use tracing::debug;

/// Contextual menus a table can show. At most one is open at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuId {
    Status,
    Tags,
    RowStatus(RecordId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Screen area occupied by a menu container, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Bounds {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && u32::from(point.x) < u32::from(self.x) + u32::from(self.width)
            && u32::from(point.y) < u32::from(self.y) + u32::from(self.height)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropdownCoordinator {
    active: Option<MenuId>,
    containers: Vec<Bounds>,
}

impl DropdownCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&MenuId> {
        self.active.as_ref()
    }

    pub fn is_open(&self, menu: &MenuId) -> bool {
        self.active.as_ref() == Some(menu)
    }

    /// Opens `menu`, closing whichever menu was open. Toggling the menu that
    /// is already open closes it. Returns whether `menu` is open afterwards.
    pub fn toggle(&mut self, menu: MenuId) -> bool {
        self.containers.clear();
        if self.active.as_ref() == Some(&menu) {
            debug!(?menu, "menu closed");
            self.active = None;
            return false;
        }
        debug!(?menu, "menu opened");
        self.active = Some(menu);
        true
    }

    /// Returns whether a menu was open.
    pub fn close(&mut self) -> bool {
        self.containers.clear();
        self.active.take().is_some()
    }

    /// Replaces the container areas of the open menu. Called by the view on
    /// every draw; ignored while no menu is open.
    pub fn set_containers(&mut self, containers: impl IntoIterator<Item = Bounds>) {
        self.containers.clear();
        if self.active.is_some() {
            self.containers.extend(containers);
        }
    }

    pub fn register(&mut self, container: Bounds) {
        if self.active.is_some() {
            self.containers.push(container);
        }
    }

    pub fn containers(&self) -> &[Bounds] {
        &self.containers
    }

    /// Handles a pointer press anywhere on screen. A press outside every
    /// registered container closes the open menu. Returns whether it did.
    pub fn pointer_down(&mut self, point: Point) -> bool {
        if self.active.is_none() {
            return false;
        }
        if self.containers.iter().any(|bounds| bounds.contains(point)) {
            return false;
        }
        debug!(x = point.x, y = point.y, "outside press closed menu");
        self.close()
    }
}

/// A process-wide source of pointer events that must be switched on while a
/// table view is mounted.
pub trait PointerSource {
    type Error;

    fn attach(&mut self) -> Result<(), Self::Error>;
    fn detach(&mut self);
}

/// Keeps a [`PointerSource`] attached for as long as the guard lives.
/// Dropping the guard detaches it on every exit path, including unwinding.
#[derive(Debug)]
pub struct PointerListener<S: PointerSource> {
    source: S,
}

impl<S: PointerSource> PointerListener<S> {
    pub fn attach(mut source: S) -> Result<Self, S::Error> {
        source.attach()?;
        Ok(Self { source })
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: PointerSource> Drop for PointerListener<S> {
    fn drop(&mut self) {
        self.source.detach();
    }
}
