use chrono::Utc;
use sea_orm::EntityTrait;
use test_utils::{builder::TestBuilder, factory};

use crate::{
    data::{
        roster::RosterRepository,
        sticky::StickyRepository,
        store::{RosterStore, StickyStore},
    },
    error::AppError,
    model::{
        position::PositionCatalog,
        roster::Member,
        sticky::{StickyBody, StickyConfig, StickySnapshot},
    },
};
