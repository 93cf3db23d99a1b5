//! Built-in declarations available to every script.

use crate::DeclarationOutput;

/// Built-in functions, in emission order.
pub const BUILTIN_FUNCTIONS: &[&str] = &[
    "declare function guid(): string",
    "declare function parseGuid(text: string): Guid",
    "declare function setVariable(name: string, value?: any): void;",
    "declare function getVariable(name: string): any;",
    "declare function getConfig(section: string): any;",
    "declare function isNullOrWhiteSpace(text: string): boolean;",
    "declare function isNullOrEmpty(text: string): boolean;",
    "declare function getWorkflowDefinitionIdByName(name: string): string;",
    "declare function getWorkflowDefinitionIdByTag(tag: string): string;",
    "declare function getActivity(idOrName: string): any;",
    "declare function getActivityProperty(activityIdOrName: string, propertyName: string): any;",
];

/// Ambient constants, in emission order.
pub const AMBIENT_CONSTANTS: &[&str] = &[
    "declare const activityExecutionContext: ActivityExecutionContext;",
    "declare const workflowExecutionContext: WorkflowExecutionContext;",
    "declare const workflowInstance: WorkflowInstance;",
    "declare const workflowInstanceId: string;",
    "declare const workflowDefinitionId: string;",
    "declare const workflowDefinitionVersion: number;",
    "declare const correlationId: string;",
    "declare const currentCulture: CultureInfo;",
    "declare const input: any;",
];

/// Appends the built-in functions and ambient constants.
pub fn render_preamble(output: &mut DeclarationOutput) {
    for line in BUILTIN_FUNCTIONS.iter().chain(AMBIENT_CONSTANTS) {
        output.append_line(line);
    }
}

/// The preamble as a standalone document.
pub fn preamble() -> DeclarationOutput {
    let mut output = DeclarationOutput::new();
    render_preamble(&mut output);
    output
}
