//! Validator selection for a built route.

use crate::controller::ResolvedController;
use crate::router::RouteRef;
use crate::tree::{Action, Schema, ValidationSlot};

/// The four validator slots as handed to the host. `None` means no validation for that slot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Validation {
    pub params: Option<Schema>,
    pub query: Option<Schema>,
    pub response: Option<Schema>,
    pub payload: Option<Schema>,
}

impl Validation {
    pub fn slot(&self, slot: ValidationSlot) -> Option<&Schema> {
        match slot {
            ValidationSlot::Params => self.params.as_ref(),
            ValidationSlot::Query => self.query.as_ref(),
            ValidationSlot::Response => self.response.as_ref(),
            ValidationSlot::Payload => self.payload.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: ValidationSlot) -> &mut Option<Schema> {
        match slot {
            ValidationSlot::Params => &mut self.params,
            ValidationSlot::Query => &mut self.query,
            ValidationSlot::Response => &mut self.response,
            ValidationSlot::Payload => &mut self.payload,
        }
    }

    pub fn is_empty(&self) -> bool {
        ValidationSlot::ALL.iter().all(|s| self.slot(*s).is_none())
    }
}

pub struct ValidationResolver;

impl ValidationResolver {
    /// Resolve every slot independently.
    pub fn resolve(route: &RouteRef<'_>, controller: Option<&ResolvedController>) -> Validation {
        let mut validation = Validation::default();
        for slot in ValidationSlot::ALL {
            *validation.slot_mut(slot) = Self::resolve_slot(route, controller, slot);
        }
        validation
    }

    /// Payload is never validated for GET/OPTIONS. Otherwise the route's own (inherited) schema wins,
    /// then the controller's record for the route's action.
    pub fn resolve_slot(
        route: &RouteRef<'_>,
        controller: Option<&ResolvedController>,
        slot: ValidationSlot,
    ) -> Option<Schema> {
        if slot == ValidationSlot::Payload && route.method().skips_payload_validation() {
            return None;
        }
        if let Some(schema) = route.validate(slot) {
            return Some(schema.clone());
        }
        let Action::Named(action) = route.action() else {
            return None;
        };
        controller?
            .validate()?
            .slot(slot)?
            .schema_for(action)
    }
}
