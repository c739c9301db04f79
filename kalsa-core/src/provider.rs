use std::fmt::Debug;

use async_trait::async_trait;

use crate::{
    error::SlotError,
    model::{FacilityQuery, SlotRecord},
};

pub mod avoinna24;

/// Seam over the booking API's slot-listing endpoint.
///
/// An empty vector is a meaningful answer ("nothing published for that date
/// yet"), not an error; see [`crate::checker::decide`].
#[async_trait]
pub trait SlotApi: Send + Sync + Debug {
    async fn list_slots(&self, query: &FacilityQuery) -> Result<Vec<SlotRecord>, SlotError>;
}
