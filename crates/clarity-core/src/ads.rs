use clarity_types::message::Provider;

/// Slot the sponsored entry takes in a non-empty listing
pub const AD_SLOT: usize = 1;

/// Mix one sponsored entry into a provider listing: second place when there
/// is at least one real result, the only entry otherwise.
///
/// Not idempotent. Call exactly once per reply.
pub fn insert_sponsored(mut providers: Vec<Provider>) -> Vec<Provider> {
    let slot = AD_SLOT.min(providers.len());
    providers.insert(slot, Provider::sponsored());
    providers
}
