use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wfscript_engine::{
    DeclarationGenerator, DeclarationOutput, DuplicateNamePolicy, GenerationError, GeneratorOptions, RenderingTypeDeclarations, TypeProjector,
    preamble,
};
use wfscript_registry::{ActivityType, ActivityTypeRegistry, ActivityTypeResolver, DescribedActivityType, RegistryError, TypeCatalog};
use wfscript_types::{
    ActivityDefinition, ActivityDescriptor, HostType, SCHEMA_PROPERTY, TARGET_TYPE_PROPERTY, WorkflowContextOptions, WorkflowDefinition,
};

#[derive(Debug)]
struct CountingActivityType {
    descriptor: ActivityDescriptor,
    describe_calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ActivityType for CountingActivityType {
    fn type_name(&self) -> &str {
        &self.descriptor.r#type
    }

    async fn describe(&self, _cancellation: &CancellationToken) -> Result<ActivityDescriptor, RegistryError> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.descriptor.clone())
    }
}

/// Resolver that counts lookups per call and answers from a fixed set of descriptors.
#[derive(Default)]
struct CountingResolver {
    descriptors: Vec<ActivityDescriptor>,
    resolve_calls: Arc<AtomicUsize>,
    describe_calls: Arc<AtomicUsize>,
}

impl CountingResolver {
    fn with(mut self, descriptor: ActivityDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }
}

#[async_trait]
impl ActivityTypeResolver for CountingResolver {
    async fn resolve_activity_type(&self, name: &str, _cancellation: &CancellationToken) -> Result<Arc<dyn ActivityType>, RegistryError> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        let descriptor = self
            .descriptors
            .iter()
            .find(|descriptor| descriptor.r#type == name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownActivityType { name: name.to_string() })?;
        Ok(Arc::new(CountingActivityType {
            descriptor,
            describe_calls: Arc::clone(&self.describe_calls),
        }))
    }
}

/// Resolver that never answers.
struct StalledResolver;

#[async_trait]
impl ActivityTypeResolver for StalledResolver {
    async fn resolve_activity_type(&self, _name: &str, _cancellation: &CancellationToken) -> Result<Arc<dyn ActivityType>, RegistryError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(RegistryError::UnknownActivityType { name: "stalled".into() })
    }
}

/// Resolver whose lookups finish after a per-type delay, recording the order they complete in.
struct DelayedResolver {
    delays: Vec<(&'static str, u64)>,
    completed: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl ActivityTypeResolver for DelayedResolver {
    async fn resolve_activity_type(&self, name: &str, _cancellation: &CancellationToken) -> Result<Arc<dyn ActivityType>, RegistryError> {
        let delay = self
            .delays
            .iter()
            .find(|(type_name, _)| *type_name == name)
            .map(|(_, delay)| *delay)
            .ok_or_else(|| RegistryError::UnknownActivityType { name: name.to_string() })?;
        tokio::time::sleep(Duration::from_millis(delay)).await;
        self.completed.lock().unwrap().push(name.to_string());
        Ok(Arc::new(DescribedActivityType::new(
            ActivityDescriptor::new(name).with_input("Value", HostType::String),
        )))
    }
}

/// Activity type whose describe call never finishes.
#[derive(Debug)]
struct StalledDescribeType {
    describe_calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ActivityType for StalledDescribeType {
    fn type_name(&self) -> &str {
        "Slow"
    }

    async fn describe(&self, _cancellation: &CancellationToken) -> Result<ActivityDescriptor, RegistryError> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(ActivityDescriptor::new("Slow"))
    }
}

/// Resolver that answers at once with a [`StalledDescribeType`].
struct StalledDescribeResolver {
    describe_calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ActivityTypeResolver for StalledDescribeResolver {
    async fn resolve_activity_type(&self, _name: &str, _cancellation: &CancellationToken) -> Result<Arc<dyn ActivityType>, RegistryError> {
        Ok(Arc::new(StalledDescribeType {
            describe_calls: Arc::clone(&self.describe_calls),
        }))
    }
}

fn email_descriptor() -> ActivityDescriptor {
    ActivityDescriptor::new("EmailActivity")
        .with_input("To", HostType::String)
        .with_output("MessageId", HostType::String)
}

fn workflow(activities: Vec<ActivityDefinition>) -> WorkflowDefinition {
    WorkflowDefinition {
        definition_id: "notify".into(),
        activities,
        ..Default::default()
    }
}

fn preamble_text() -> String {
    preamble().into_string()
}

#[tokio::test]
async fn without_workflow_only_the_preamble_is_emitted() {
    let generator = DeclarationGenerator::new(Arc::new(CountingResolver::default()));

    let output = generator.generate_with(None, &CancellationToken::new()).await.unwrap();

    assert_eq!(output.as_str(), preamble_text());
    assert_eq!(output.line_count(), 20);
}

#[tokio::test]
async fn empty_workflow_emits_preamble_and_empty_aggregate() {
    let generator = DeclarationGenerator::new(Arc::new(CountingResolver::default()));

    let first = generator.generate_with(Some(&workflow(vec![])), &CancellationToken::new()).await.unwrap();
    let second = generator.generate_with(Some(&workflow(vec![])), &CancellationToken::new()).await.unwrap();

    let expected = format!("{}declare interface Activities {{\n}}\ndeclare const activities: Activities\n", preamble_text());
    assert_eq!(first.as_str(), expected);
    assert_eq!(first, second);
}

#[tokio::test]
async fn renders_variables_and_activity_blocks() {
    let generator = DeclarationGenerator::new(Arc::new(CountingResolver::default().with(email_descriptor())));
    let mut workflow = workflow(vec![ActivityDefinition::new("a1", "EmailActivity").with_name("SendEmail")]);
    workflow.variables.set("counter", json!(5));

    let output = generator.generate_with(Some(&workflow), &CancellationToken::new()).await.unwrap();

    let expected = format!(
        "{}declare const counter: number\n\
         declare interface EmailActivity {{\n\
         To(): string;\n\
         MessageId(): string;\n\
         }}\n\
         declare interface Activities {{\n\
         SendEmail: EmailActivity;\n\
         }}\n\
         declare const activities: Activities\n",
        preamble_text()
    );
    assert_eq!(output.as_str(), expected);
}

#[tokio::test]
async fn context_and_null_variables_are_projected() {
    let mut catalog = TypeCatalog::new();
    catalog.declare("Acme.Orders.OrderContext");
    let generator = DeclarationGenerator::new(Arc::new(CountingResolver::default())).with_catalog(catalog);

    let mut workflow = workflow(vec![]);
    workflow.context_options = Some(WorkflowContextOptions {
        context_type: Some(HostType::Named("Acme.Orders.OrderContext".into())),
        ..Default::default()
    });
    workflow.variables.set("pending", json!(null));
    workflow.variables.set_typed("startedAt", json!(null), HostType::DateTimeOffset);
    workflow.variables.set("tags", json!(["a", "b"]));

    let output = generator.generate_with(Some(&workflow), &CancellationToken::new()).await.unwrap();
    let declared: Vec<&str> = output.lines().skip(20).take(4).collect();

    assert_eq!(
        declared,
        vec![
            "declare const workflowContext: OrderContext",
            "declare const pending: any",
            "declare const startedAt: Date",
            "declare const tags: Array<any>",
        ]
    );
}

#[tokio::test]
async fn shared_activity_type_is_resolved_and_described_once() {
    let resolver = CountingResolver::default().with(email_descriptor());
    let resolve_calls = Arc::clone(&resolver.resolve_calls);
    let describe_calls = Arc::clone(&resolver.describe_calls);
    let generator = DeclarationGenerator::new(Arc::new(resolver));
    let workflow = workflow(vec![
        ActivityDefinition::new("a1", "EmailActivity").with_name("Welcome"),
        ActivityDefinition::new("a2", "EmailActivity").with_name("Reminder"),
    ]);

    let output = generator.generate_with(Some(&workflow), &CancellationToken::new()).await.unwrap();

    assert_eq!(resolve_calls.load(Ordering::SeqCst), 1);
    assert_eq!(describe_calls.load(Ordering::SeqCst), 1);
    assert_eq!(output.lines().filter(|line| *line == "declare interface EmailActivity {").count(), 1);
    assert!(output.as_str().contains("Welcome: EmailActivity;\nReminder: EmailActivity;\n"));
}

#[tokio::test]
async fn blocks_follow_first_seen_order() {
    let resolver = CountingResolver::default()
        .with(email_descriptor())
        .with(ActivityDescriptor::new("WriteLine").with_input("Text", HostType::String));
    let generator = DeclarationGenerator::new(Arc::new(resolver));
    let workflow = workflow(vec![
        ActivityDefinition::new("a1", "WriteLine").with_name("Log"),
        ActivityDefinition::new("a2", "EmailActivity").with_name("Notify"),
        ActivityDefinition::new("a3", "WriteLine").with_name("LogAgain"),
    ]);

    let output = generator.generate_with(Some(&workflow), &CancellationToken::new()).await.unwrap();
    let headers: Vec<&str> = output.lines().filter(|line| line.starts_with("declare interface")).collect();

    assert_eq!(
        headers,
        vec!["declare interface WriteLine {", "declare interface EmailActivity {", "declare interface Activities {"]
    );
}

#[tokio::test]
async fn output_order_ignores_resolution_completion_order() {
    let completed = Arc::new(Mutex::new(Vec::new()));
    let resolver = DelayedResolver {
        delays: vec![("A", 80), ("B", 1)],
        completed: Arc::clone(&completed),
    };
    let generator = DeclarationGenerator::new(Arc::new(resolver));
    let workflow = workflow(vec![
        ActivityDefinition::new("a1", "A").with_name("First"),
        ActivityDefinition::new("a2", "B").with_name("Second"),
        ActivityDefinition::new("a3", "A").with_name("Third"),
    ]);

    let output = generator.generate_with(Some(&workflow), &CancellationToken::new()).await.unwrap();

    assert_eq!(*completed.lock().unwrap(), vec!["B".to_string(), "A".to_string()]);
    let headers: Vec<&str> = output.lines().filter(|line| line.starts_with("declare interface")).collect();
    assert_eq!(headers, vec!["declare interface A {", "declare interface B {", "declare interface Activities {"]);
    assert!(output.as_str().ends_with(
        "declare interface Activities {\nFirst: A;\nSecond: B;\nThird: A;\n}\ndeclare const activities: Activities\n"
    ));
}

#[tokio::test]
async fn unnamed_activities_do_not_contribute_types() {
    let resolver = CountingResolver::default().with(email_descriptor());
    let resolve_calls = Arc::clone(&resolver.resolve_calls);
    let generator = DeclarationGenerator::new(Arc::new(resolver));
    let workflow = workflow(vec![
        ActivityDefinition::new("a1", "EmailActivity").with_name("Notify"),
        ActivityDefinition::new("a2", "NotRegistered"),
    ]);

    let output = generator.generate_with(Some(&workflow), &CancellationToken::new()).await.unwrap();

    assert_eq!(resolve_calls.load(Ordering::SeqCst), 1);
    assert!(!output.as_str().contains("NotRegistered"));
}

#[tokio::test]
async fn schema_takes_precedence_over_target_type() {
    let resolver = CountingResolver::default().with(ActivityDescriptor::new("ReadJson").with_output("Output", HostType::Object));
    let generator = DeclarationGenerator::new(Arc::new(resolver));
    let workflow = workflow(vec![
        ActivityDefinition::new("a1", "ReadJson")
            .with_name("WithBoth")
            .with_literal_property(TARGET_TYPE_PROPERTY, "System.Int32")
            .with_literal_property(SCHEMA_PROPERTY, r#"{"type":"object"}"#),
        ActivityDefinition::new("a2", "ReadJson")
            .with_name("WithTarget")
            .with_literal_property(TARGET_TYPE_PROPERTY, "System.Int32"),
        ActivityDefinition::new("a3", "ReadJson")
            .with_name("WithUnknownTarget")
            .with_literal_property(TARGET_TYPE_PROPERTY, "Acme.Missing, Acme"),
    ]);

    let output = generator.generate_with(Some(&workflow), &CancellationToken::new()).await.unwrap();

    assert!(output.as_str().contains("WithBoth: ReadJson<Json>;\n"));
    assert!(output.as_str().contains("WithTarget: ReadJson<Int32>;\n"));
    assert!(output.as_str().contains("WithUnknownTarget: ReadJson;\n"));
}

#[tokio::test]
async fn http_endpoint_block_is_generic() {
    let resolver = CountingResolver::default().with(
        ActivityDescriptor::new("HttpEndpoint")
            .with_input("Path", HostType::String)
            .with_output("Output", HostType::String),
    );
    let generator = DeclarationGenerator::new(Arc::new(resolver));
    let workflow = workflow(vec![ActivityDefinition::new("a1", "HttpEndpoint").with_name("Api")]);

    let output = generator.generate_with(Some(&workflow), &CancellationToken::new()).await.unwrap();

    assert!(
        output
            .as_str()
            .contains("declare interface HttpEndpoint<T> {\nPath(): string;\nOutput(): string<T>;\n}\n")
    );
    assert!(output.as_str().contains("Api: HttpEndpoint;\n"));
}

#[tokio::test]
async fn unknown_activity_type_fails_generation() {
    let generator = DeclarationGenerator::new(Arc::new(ActivityTypeRegistry::new()));
    let workflow = workflow(vec![ActivityDefinition::new("a1", "Missing").with_name("Step")]);

    let error = generator.generate_with(Some(&workflow), &CancellationToken::new()).await.unwrap_err();

    assert!(matches!(
        error,
        GenerationError::Registry(RegistryError::UnknownActivityType { ref name }) if name == "Missing"
    ));
    assert!(!error.is_cancelled());
}

#[tokio::test]
async fn cancellation_abandons_outstanding_resolutions() {
    let generator = DeclarationGenerator::new(Arc::new(StalledResolver));
    let workflow = workflow(vec![ActivityDefinition::new("a1", "Slow").with_name("Step")]);
    let cancellation = CancellationToken::new();

    let trigger = cancellation.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let error = generator.generate_with(Some(&workflow), &cancellation).await.unwrap_err();
    assert!(error.is_cancelled());
}

#[tokio::test]
async fn cancellation_abandons_pending_describe() {
    let describe_calls = Arc::new(AtomicUsize::new(0));
    let generator = DeclarationGenerator::new(Arc::new(StalledDescribeResolver {
        describe_calls: Arc::clone(&describe_calls),
    }));
    let workflow = workflow(vec![ActivityDefinition::new("a1", "Slow").with_name("Step")]);
    let cancellation = CancellationToken::new();

    let trigger = cancellation.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let error = generator.generate_with(Some(&workflow), &cancellation).await.unwrap_err();
    assert!(error.is_cancelled());
    assert_eq!(describe_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn activity_names_are_emitted_as_written() {
    let generator = DeclarationGenerator::new(Arc::new(CountingResolver::default().with(email_descriptor())));
    let workflow = workflow(vec![ActivityDefinition::new("a1", "EmailActivity").with_name("  Padded ")]);

    let output = generator.generate_with(Some(&workflow), &CancellationToken::new()).await.unwrap();

    assert!(output.as_str().contains("\n  Padded : EmailActivity;\n"));
}

#[tokio::test]
async fn failed_request_leaves_output_untouched() {
    let generator = DeclarationGenerator::new(Arc::new(ActivityTypeRegistry::new()));
    let mut request = RenderingTypeDeclarations::new(
        Some(workflow(vec![ActivityDefinition::new("a1", "Missing").with_name("Step")])),
        TypeProjector::default(),
    );
    request.output.append_line("// existing");

    assert!(generator.handle(&mut request, &CancellationToken::new()).await.is_err());
    assert_eq!(request.output.as_str(), "// existing\n");

    let cancelled = CancellationToken::new();
    cancelled.cancel();
    let error = generator.handle(&mut request, &cancelled).await.unwrap_err();
    assert!(error.is_cancelled());
    assert_eq!(request.output.line_count(), 1);
}

#[tokio::test]
async fn successful_request_appends_document() {
    let generator = DeclarationGenerator::new(Arc::new(ActivityTypeRegistry::new()));
    let mut request = RenderingTypeDeclarations::new(None, generator.projector());

    generator.handle(&mut request, &CancellationToken::new()).await.unwrap();

    let mut expected = DeclarationOutput::new();
    expected.append(preamble());
    assert_eq!(request.output, expected);
}

#[tokio::test]
async fn duplicate_names_follow_configured_policy() {
    let resolver = Arc::new(CountingResolver::default().with(email_descriptor()));
    let workflow = workflow(vec![
        ActivityDefinition::new("a1", "EmailActivity").with_name("Notify"),
        ActivityDefinition::new("a2", "EmailActivity").with_name("Notify"),
    ]);

    let rejecting = DeclarationGenerator::new(resolver.clone());
    let error = rejecting.generate_with(Some(&workflow), &CancellationToken::new()).await.unwrap_err();
    assert!(matches!(error, GenerationError::DuplicateActivityName { ref name } if name == "Notify"));

    let lenient = DeclarationGenerator::new(resolver).with_options(GeneratorOptions {
        duplicate_names: DuplicateNamePolicy::FirstSeenWins,
    });
    let output = lenient.generate_with(Some(&workflow), &CancellationToken::new()).await.unwrap();
    assert_eq!(output.lines().filter(|line| line.starts_with("Notify:")).count(), 1);
}
