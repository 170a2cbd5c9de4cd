//! Client-side task manager: period views, status filters, rendering and the
//! event handling that keeps the local task cache in sync with the API.

pub mod controller;
pub mod filter;
pub mod period;
pub mod render;
pub mod state;

pub use controller::{
    Clock, Frontend, Notification, NotificationLevel, TaskForm, TaskManager, UiEvent,
};
pub use filter::{period_stats, period_tasks, visible_tasks, PeriodStats};
pub use period::{navigate, Direction, Period, PeriodView};
pub use render::{render, RenderedView, TaskAction, TaskCard};
pub use state::{StatusFilter, ViewState};
