//! Scripted in-memory automation backend for exercising the lookup pipeline.

#![allow(dead_code)]

use async_trait::async_trait;
use comparendos::portal::{Automation, AutomationError, BrowserSession, IdleCondition, PortalPage};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Launch,
    NewPage,
    Goto,
    Type,
    Click,
    WaitForNavigation,
    Content,
    Close,
}

/// Everything the fake observed, shared between the automation, session and page.
#[derive(Default)]
pub struct Recorder {
    steps: Mutex<Vec<Step>>,
    typed: Mutex<Vec<String>>,
    closes: AtomicUsize,
    contents_served: AtomicUsize,
    waiter_attached: AtomicBool,
    navigated: Notify,
}

impl Recorder {
    pub fn steps(&self) -> Vec<Step> {
        self.steps.lock().unwrap().clone()
    }

    pub fn typed(&self) -> Vec<String> {
        self.typed.lock().unwrap().clone()
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    fn record(&self, step: Step) {
        self.steps.lock().unwrap().push(step);
    }
}

#[derive(Clone)]
pub struct FakeAutomation {
    document: String,
    fail_at: Option<Step>,
    /// 1-based `content()` call that fails, when `fail_at` is not `Content`.
    fail_content_call: Option<usize>,
    recorder: Arc<Recorder>,
}

impl FakeAutomation {
    pub fn serving(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            fail_at: None,
            fail_content_call: None,
            recorder: Arc::default(),
        }
    }

    pub fn failing_at(mut self, step: Step) -> Self {
        self.fail_at = Some(step);
        self
    }

    pub fn failing_content_call(mut self, call: usize) -> Self {
        self.fail_content_call = Some(call);
        self
    }

    pub fn recorder(&self) -> Arc<Recorder> {
        self.recorder.clone()
    }

    fn check(&self, step: Step) -> Result<(), AutomationError> {
        self.recorder.record(step);
        if self.fail_at != Some(step) {
            return Ok(());
        }
        Err(match step {
            Step::Launch => AutomationError::Launch("chrome not found".into()),
            Step::NewPage => AutomationError::Protocol("target closed".into()),
            Step::Goto => AutomationError::Navigation("net::ERR_CONNECTION_REFUSED".into()),
            Step::Type => AutomationError::ElementNotFound {
                selector: "input".into(),
                reason: "no node".into(),
            },
            Step::Click => AutomationError::ElementNotFound {
                selector: "a".into(),
                reason: "no node".into(),
            },
            Step::WaitForNavigation => AutomationError::Timeout {
                operation: "wait for navigation",
                after: Duration::from_secs(30),
            },
            Step::Content => AutomationError::Evaluation("execution context destroyed".into()),
            Step::Close => AutomationError::Close("already gone".into()),
        })
    }
}

#[async_trait]
impl Automation for FakeAutomation {
    type Session = FakeSession;

    async fn launch(&self) -> Result<FakeSession, AutomationError> {
        self.check(Step::Launch)?;
        Ok(FakeSession {
            script: self.clone(),
        })
    }
}

pub struct FakeSession {
    script: FakeAutomation,
}

#[async_trait]
impl BrowserSession for FakeSession {
    type Page = FakePage;

    async fn new_page(&self) -> Result<FakePage, AutomationError> {
        self.script.check(Step::NewPage)?;
        Ok(FakePage {
            script: self.script.clone(),
        })
    }

    async fn close(self) -> Result<(), AutomationError> {
        self.script.recorder.closes.fetch_add(1, Ordering::SeqCst);
        self.script.check(Step::Close)
    }
}

pub struct FakePage {
    script: FakeAutomation,
}

#[async_trait]
impl PortalPage for FakePage {
    async fn goto(&self, _url: &str, _idle: &IdleCondition) -> Result<(), AutomationError> {
        self.script.check(Step::Goto)
    }

    async fn type_text(&self, _selector: &str, text: &str) -> Result<(), AutomationError> {
        self.script.check(Step::Type)?;
        self.script.recorder.typed.lock().unwrap().push(text.to_owned());
        Ok(())
    }

    /// Fires the postback; fails like a missed navigation when nobody is waiting yet.
    async fn click(&self, _selector: &str) -> Result<(), AutomationError> {
        self.script.check(Step::Click)?;
        let recorder = &self.script.recorder;
        if !recorder.waiter_attached.load(Ordering::SeqCst) {
            return Err(AutomationError::Navigation(
                "navigation finished before a waiter was attached".into(),
            ));
        }
        recorder.navigated.notify_one();
        Ok(())
    }

    async fn wait_for_navigation(&self, _idle: &IdleCondition) -> Result<(), AutomationError> {
        self.script.check(Step::WaitForNavigation)?;
        let recorder = &self.script.recorder;
        recorder.waiter_attached.store(true, Ordering::SeqCst);
        recorder.navigated.notified().await;
        Ok(())
    }

    async fn content(&self) -> Result<String, AutomationError> {
        self.script.check(Step::Content)?;
        let call = self.script.recorder.contents_served.fetch_add(1, Ordering::SeqCst) + 1;
        if self.script.fail_content_call == Some(call) {
            return Err(AutomationError::Evaluation("page crashed".into()));
        }
        Ok(self.script.document.clone())
    }
}

/// Render a portal results page with the given physical and electronic tables.
///
/// `None` omits the table element entirely.
pub fn portal_page(physical: Option<&str>, electronic: Option<&str>) -> String {
    let wrap = |id: &str, table: Option<&str>| {
        table
            .map(|body| format!(r#"<div id="{id}" class="ui-datatable">{body}</div>"#))
            .unwrap_or_default()
    };
    format!(
        r##"<html><body><form id="form">
             <input id="form:hora" type="text" value="">
             <a id="form:btnIngresar" href="#">Consultar</a>
             {}
             {}
           </form></body></html>"##,
        wrap("form:tbl", physical),
        wrap("form:tblelectronicos", electronic),
    )
}

pub const HEADERS: [&str; 9] = [
    "Id Documento",
    "Tipo Sanción",
    "Estado Comparendo",
    "Nro Comparendo",
    "Costas",
    "Interés",
    "Valor Multa",
    "Número Resolución",
    "Fecha Resolución",
];

/// A `<table>` with the given headers and rows of cells.
pub fn table(headers: &[&str], rows: &[&[&str]]) -> String {
    let head: String = headers.iter().map(|h| format!("<th>{h}</th>")).collect();
    let body: String = rows
        .iter()
        .map(|row| {
            let cells: String = row.iter().map(|c| format!("<td>{c}</td>")).collect();
            format!("<tr>{cells}</tr>")
        })
        .collect();
    format!("<table><thead><tr>{head}</tr></thead><tbody>{body}</tbody></table>")
}

pub fn empty_table() -> String {
    format!(
        r#"<table><thead><tr>{}</tr></thead><tbody><tr class="ui-datatable-empty-message"><td colspan="9">No records found.</td></tr></tbody></table>"#,
        HEADERS.iter().map(|h| format!("<th>{h}</th>")).collect::<String>()
    )
}
