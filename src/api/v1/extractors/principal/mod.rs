/*!
 * Principal extractors
 *
 * Responsibility:
 * - hand the request's `Principal` (attached by the authentication gate) to handlers
 * - `CurrentPrincipal` rejects anonymous requests; `MaybePrincipal` never rejects
 */

mod core;

pub use core::{CurrentPrincipal, MaybePrincipal};
