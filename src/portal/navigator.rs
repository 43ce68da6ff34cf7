//! Drives the portal page from a blank tab to the searched state.

use tracing::debug;

use super::browser::{BrowserSession, IdleCondition, PortalPage};
use super::errors::AutomationError;
use super::{SEARCH_BUTTON, TEXT_INPUT};

pub struct Navigator<P> {
    page: P,
    idle: IdleCondition,
}

impl<P: PortalPage> Navigator<P> {
    /// Open a page on `session`, navigate to `url` and wait for the network to settle.
    pub async fn launch<S>(
        session: &S,
        url: &str,
        idle: IdleCondition,
    ) -> Result<Self, AutomationError>
    where
        S: BrowserSession<Page = P>,
    {
        let page = session.new_page().await?;
        page.goto(url, &idle).await?;
        debug!(url, "portal loaded");
        Ok(Self { page, idle })
    }

    /// Type the plate and submit the search form.
    ///
    /// The navigation waiter is issued alongside the click so a fast postback
    /// cannot complete before anything is listening for it.
    pub async fn search(&self, license_plate: &str) -> Result<(), AutomationError> {
        self.page.type_text(TEXT_INPUT, license_plate).await?;
        tokio::try_join!(
            self.page.wait_for_navigation(&self.idle),
            self.page.click(SEARCH_BUTTON),
        )?;
        debug!(plate = license_plate, "search submitted");
        Ok(())
    }

    pub fn page(&self) -> &P {
        &self.page
    }
}
