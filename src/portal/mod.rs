//! Automation of the Barranquilla account-status portal ("Consulta Estado de Cuenta").
//!
//! The portal is a JSF application: a single plate field and a submit link
//! trigger a full postback, after which two result tables are rendered, one for
//! physical tickets and one for electronic (camera) tickets.

pub mod browser;
pub mod chromium;
pub mod errors;
pub mod navigator;

pub use browser::{Automation, BrowserSession, IdleCondition, PortalPage};
pub use chromium::{ChromiumAutomation, ChromiumOptions};
pub use errors::AutomationError;
pub use navigator::Navigator;

pub const PORTAL_URL: &str =
    "https://portal.barranquilla.gov.co:8181/ConsultaEstadoCuenta/consultaPlaca";

// JSF ids contain `:`, so attribute selectors avoid CSS escaping.
pub const TEXT_INPUT: &str = r#"input[id="form:hora"]"#;
pub const SEARCH_BUTTON: &str = r#"a[id="form:btnIngresar"]"#;
pub const PHYSICAL_TICKETS_TABLE: &str = r#"[id="form:tbl"]"#;
pub const VIRTUAL_TICKETS_TABLE: &str = r#"[id="form:tblelectronicos"]"#;
