//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::error::{Error, Result};
use crate::loader::{load_resource, ResourceDefinition};
use crate::pagination::{ListOptions, LoadingStatus, PaginationController};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::List { pages } => self.list(*pages).await,
            Commands::Detail { id } => self.detail(id).await,
            Commands::Schema => self.schema().await,
            Commands::Validate => self.validate(),
        }
    }

    /// Load resource definition
    fn load_resource(&self) -> Result<ResourceDefinition> {
        let path = self
            .cli
            .resource
            .as_ref()
            .ok_or_else(|| Error::config("Resource file not specified (use -r flag)"))?;
        load_resource(path)
    }

    /// Controller options with command-line overrides applied
    pub fn list_options(&self, def: &ResourceDefinition) -> ListOptions {
        let mut options = def.list_options();
        if let Some(per_page) = self.cli.per_page {
            options = options.with_per_page(per_page);
        }
        if let Some(sort) = &self.cli.sort {
            options = options.with_sort(sort.clone());
        }
        if let Some(fields) = &self.cli.fields {
            options = options.with_fields(fields.clone());
        }
        for (key, value) in &self.cli.filters {
            options = options.with_filter(key.clone(), value.clone());
        }
        options
    }

    /// Build a controller over the configured resource
    fn controller(&self) -> Result<PaginationController> {
        let def = self.load_resource()?;
        let options = self.list_options(&def);
        let client = def.client()?;
        debug!(resource = %def.name, ?options, "Created controller");
        Ok(PaginationController::new(Arc::new(client), options))
    }

    /// Reload and load pages until exhausted or `pages` are loaded
    async fn list(&self, pages: Option<u32>) -> Result<()> {
        let start = Instant::now();
        let mut controller = self.controller()?;

        Self::load_first_page(&mut controller).await?;
        let mut loaded = 1u32;

        while Self::has_more_pages(&controller) && pages.map_or(true, |max| loaded < max) {
            let before = controller.current_page();
            Self::ensure_ok(controller.fetch_more().await, &controller)?;
            loaded += 1;
            if controller.current_page() <= before {
                warn!(
                    page = controller.current_page(),
                    "Server did not advance the current page, stopping"
                );
                break;
            }
        }

        for record in controller.records() {
            self.output_message(&json!({
                "type": "RECORD",
                "record": record,
            }));
        }

        let meta = controller.pagination();
        info!(
            rows = controller.len(),
            pages = loaded,
            current_page = meta.current_page,
            page_count = meta.page_count,
            total_count = meta.total_count,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "List complete"
        );
        eprintln!(
            "{} records, page {}/{}, {} total",
            controller.len(),
            meta.current_page,
            meta.page_count,
            meta.total_count
        );
        Ok(())
    }

    /// Load the first page, then the detail of `id`
    async fn detail(&self, id: &str) -> Result<()> {
        let mut controller = self.controller()?;
        Self::load_first_page(&mut controller).await?;

        Self::ensure_ok(controller.fetch_detail(id).await, &controller)?;

        let view = controller.detail_view();
        let record = view
            .first()
            .ok_or_else(|| Error::Other(format!("No record with id '{id}'")))?;
        self.output_message(&json!({
            "type": "DETAIL",
            "id": id,
            "record": record,
        }));
        Ok(())
    }

    /// Load the first page and print the role table
    async fn schema(&self) -> Result<()> {
        let mut controller = self.controller()?;
        Self::load_first_page(&mut controller).await?;

        let roles: Vec<Value> = controller
            .role_names()
            .map(|(role, field)| json!({"role": role, "field": field}))
            .collect();
        self.output_message(&json!({
            "type": "SCHEMA",
            "id_field": controller.id_field(),
            "id_role": controller.id_field_role(),
            "roles": roles,
        }));
        Ok(())
    }

    /// Validate resource definition
    fn validate(&self) -> Result<()> {
        let def = self.load_resource()?;
        def.client()?;

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!(
                    "Resource '{}' is valid ({}{}, {} per page)",
                    def.name,
                    def.base_url.trim_end_matches('/'),
                    def.path,
                    def.per_page
                )
            }
        }));
        Ok(())
    }

    async fn load_first_page(controller: &mut PaginationController) -> Result<()> {
        controller.reload();
        let status = controller.fetch_more().await;
        Self::ensure_ok(status, controller)
    }

    /// Pages remain according to both the list and the server's page count
    fn has_more_pages(controller: &PaginationController) -> bool {
        controller.can_fetch_more() && controller.current_page() < controller.page_count()
    }

    fn ensure_ok(status: LoadingStatus, controller: &PaginationController) -> Result<()> {
        if status == LoadingStatus::Error {
            let error = controller.loading_error();
            return Err(Error::Other(format!("{} ({})", error.message, error.code)));
        }
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
