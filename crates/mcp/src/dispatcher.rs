//! Routes tool calls to the payload builder and the reporting service.

use jsreport::{
    DEFAULT_ENGINE, DEFAULT_RECIPE, PayloadBuilder, RawRenderOptions, ReportBackend,
    ReportRequest, Result,
};
use serde_json::Value;
use tracing::debug;

use crate::protocol::{RenderHtmlArgs, RenderReply, TemplateInfoReply, TemplateListReply};

/// Stateless adapter between tool arguments and a [`ReportBackend`].
pub struct Dispatcher<B> {
    backend: B,
    builder: PayloadBuilder,
}

impl<B: ReportBackend> Dispatcher<B> {
    pub fn new(backend: B, builder: PayloadBuilder) -> Self {
        Self { backend, builder }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn generate_report(&self, request: ReportRequest) -> Result<RenderReply> {
        let report = self.builder.build(request)?;
        debug!(template = %report.template_name, "payload built");

        let pdf = self
            .backend
            .render(&report.template_name, &report.payload)
            .await?;
        Ok(RenderReply::new("Report generated successfully", &pdf).with_template(report.template_name))
    }

    pub async fn list_templates(&self) -> Result<TemplateListReply> {
        Ok(self.backend.list_templates().await?.into())
    }

    pub async fn get_template_info(&self, template_name: &str) -> Result<TemplateInfoReply> {
        Ok(self.backend.get_template_info(template_name.trim()).await?.into())
    }

    pub async fn render_custom_html(&self, args: RenderHtmlArgs) -> Result<RenderReply> {
        let options = RawRenderOptions {
            recipe: non_blank(args.recipe).unwrap_or_else(|| DEFAULT_RECIPE.to_string()),
            engine: non_blank(args.engine).unwrap_or_else(|| DEFAULT_ENGINE.to_string()),
            data: args.data.map(Value::Object),
        };
        let pdf = self
            .backend
            .render_raw_html(&args.html_content, &options)
            .await?;
        Ok(RenderReply::new("HTML rendered successfully", &pdf))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsreport::{Error, RenderedReport, TemplateDescriptor, TemplatePayload};
    use serde_json::Map;
    use std::sync::Mutex;

    /// Records every call and answers from canned data.
    #[derive(Default)]
    struct FakeBackend {
        calls: Mutex<Vec<String>>,
        last_options: Mutex<Option<RawRenderOptions>>,
        templates: Vec<TemplateDescriptor>,
    }

    impl FakeBackend {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn pdf() -> RenderedReport {
            RenderedReport {
                bytes: b"%PDF-fake".to_vec(),
                content_type: "application/pdf".into(),
            }
        }
    }

    impl ReportBackend for FakeBackend {
        async fn render(&self, template_name: &str, _payload: &TemplatePayload) -> Result<RenderedReport> {
            self.calls.lock().unwrap().push(format!("render:{template_name}"));
            Ok(Self::pdf())
        }

        async fn list_templates(&self) -> Result<Vec<TemplateDescriptor>> {
            self.calls.lock().unwrap().push("list".into());
            Ok(self.templates.clone())
        }

        async fn get_template_info(&self, template_name: &str) -> Result<TemplateDescriptor> {
            self.calls.lock().unwrap().push(format!("info:{template_name}"));
            self.templates
                .iter()
                .find(|t| t.name == template_name)
                .cloned()
                .ok_or_else(|| Error::NotFound(template_name.to_string()))
        }

        async fn render_raw_html(&self, _html: &str, options: &RawRenderOptions) -> Result<RenderedReport> {
            self.calls.lock().unwrap().push("html".into());
            *self.last_options.lock().unwrap() = Some(options.clone());
            Ok(Self::pdf())
        }
    }

    fn descriptor(name: &str) -> TemplateDescriptor {
        let mut entity = Map::new();
        entity.insert("name".into(), name.into());
        TemplateDescriptor::from_entity(entity).unwrap()
    }

    fn dispatcher() -> Dispatcher<FakeBackend> {
        let backend = FakeBackend {
            templates: vec![descriptor("data-report"), descriptor("invoice")],
            ..Default::default()
        };
        Dispatcher::new(backend, PayloadBuilder::new("data-report"))
    }

    fn request() -> ReportRequest {
        ReportRequest {
            title: "Sales".into(),
            subtitle: "Monthly".into(),
            client_name: "ACME".into(),
            period: "January 2026".into(),
            report_type: "Sales".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn generate_report_renders_default_template() {
        let d = dispatcher();
        let reply = d.generate_report(request()).await.unwrap();

        assert!(reply.success);
        assert_eq!(reply.template_used.as_deref(), Some("data-report"));
        assert_eq!(reply.size_bytes, 9);
        assert_eq!(d.backend().calls(), ["render:data-report"]);
    }

    #[tokio::test]
    async fn invalid_request_never_reaches_backend() {
        let d = dispatcher();
        let mut req = request();
        req.client_name = String::new();

        let err = d.generate_report(req).await.unwrap_err();
        match err {
            Error::Validation(v) => assert_eq!(v.fields(), ["client_name"]),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(d.backend().calls().is_empty());
    }

    #[tokio::test]
    async fn template_listing_and_lookup() {
        let d = dispatcher();
        let list = d.list_templates().await.unwrap();
        assert_eq!(list.count, 2);

        let info = d.get_template_info(" invoice ").await.unwrap();
        assert_eq!(info.template.name, "invoice");

        let err = d.get_template_info("ghost").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(d.backend().calls(), ["list", "info:invoice", "info:ghost"]);
    }

    #[tokio::test]
    async fn custom_html_applies_defaults() {
        let d = dispatcher();
        let args = RenderHtmlArgs {
            html_content: "<p>{{x}}</p>".into(),
            recipe: Some(" ".into()),
            ..Default::default()
        };
        let reply = d.render_custom_html(args).await.unwrap();
        assert!(reply.template_used.is_none());

        let options = d.backend().last_options.lock().unwrap().clone().unwrap();
        assert_eq!(options.recipe, DEFAULT_RECIPE);
        assert_eq!(options.engine, DEFAULT_ENGINE);
        assert!(options.data.is_none());
    }
}
