use std::rc::Rc;

use crate::config::FormConfig;
use crate::form;
use crate::notebook::{Element, HostEvent, Notebook, SubscriptionId};

/// Ties the form-cell core into a notebook: stylesheet, render hooks, and the
/// re-render passes at load time and on kernel readiness.
pub struct FormCellsExtension {
    config: Rc<FormConfig>,
    subscription: Option<SubscriptionId>,
    loaded: bool,
}

impl FormCellsExtension {
    pub fn new(config: FormConfig) -> Self {
        Self {
            config: Rc::new(config),
            subscription: None,
            loaded: false,
        }
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn load(&mut self, notebook: &mut Notebook) {
        self.load_css(notebook);
        form::install(notebook, Rc::clone(&self.config));
        form::render_all_form_cells(notebook);
        self.render_form_cells_asap(notebook);
        self.loaded = true;
        tracing::info!(stylesheet = %self.config.stylesheet, "form cells extension loaded");
    }

    pub fn unload(&mut self, notebook: &mut Notebook) {
        form::uninstall(notebook);
        if let Some(id) = self.subscription.take() {
            notebook.events_mut().unsubscribe(id);
        }
        self.loaded = false;
        tracing::info!("form cells extension unloaded");
    }

    /// Appends the stylesheet link to the document head. Returns false if it is
    /// already there.
    pub fn load_css(&self, notebook: &mut Notebook) -> bool {
        let href = notebook.to_url(&self.config.stylesheet);
        let linked = notebook
            .head()
            .find(&|e: &Element| e.tag == "link" && e.attr("href") == Some(href.as_str()))
            .is_some();
        if linked {
            return false;
        }

        tracing::debug!(%href, "loading stylesheet");
        notebook.head_mut().append(
            Element::new("link")
                .with_attr("type", "text/css")
                .with_attr("rel", "stylesheet")
                .with_attr("href", href),
        );
        true
    }

    fn render_form_cells_asap(&mut self, notebook: &mut Notebook) {
        if notebook.is_kernel_ready() {
            form::render_all_form_cells(notebook);
        }
        if self.config.rerender_on_kernel_ready && self.subscription.is_none() {
            let id = notebook.events_mut().subscribe(HostEvent::KernelReady, |nb| {
                form::render_all_form_cells(nb);
            });
            self.subscription = Some(id);
        }
    }
}
