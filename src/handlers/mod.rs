// handlers/mod.rs - Two-tier handler layout
//
// Public (no CSRF token) → Protected (CSRF token on state-changing methods)
pub mod public; // Tier 1: health, service info and token issuance
pub mod protected; // Tier 2: /api/* routes behind csrf_middleware
