//! SPARC end-to-end instruction scenarios.

/// E3: `sethi` + `or` builds a 32-bit immediate.
pub mod sethi_or;
/// E4, property 5: taken and annulled-not-taken branches, with delay
/// slots.
pub mod branches;
/// E5: `subcc` overflow flags in `icc` vs `xcc`.
pub mod subcc_overflow;
/// E6: `call`/`retl` round trip through a delay slot each way.
pub mod call_retl;
/// Property 6: `save`/`restore` round-trips register contents bit for
/// bit when no window spill occurs.
pub mod window_round_trip;
/// Property 4: `addcc`/`subcc` agree with an independent reference
/// model across arbitrary operands.
pub mod reference_agreement;
