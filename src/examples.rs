//! Built-in example documents that can be quickly loaded from the UI.
//!
//! Each example is a converter output in one of the two supported formats,
//! ranging from a single decision to a small multi-service graph.

use crate::types::DiagramFormat;

/// Kinds of built-in examples available from the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleKind {
    /// Start -> Decision -> Process/End, as an Excalidraw scene
    SimpleFlowchart,
    /// Login loop with a validation step, as an Excalidraw scene
    UserAuthentication,
    /// Build/test/deploy pipeline, as a Draw.io graph
    CiPipeline,
    /// Services backed by databases, as a Draw.io graph
    DatabaseSchema,
}

/// Metadata for a single example.
pub struct ExampleInfo {
    /// Stable identifier for the example
    pub kind: ExampleKind,
    /// Human-friendly display name
    pub name: &'static str,
    /// One-line summary shown as a tooltip
    pub description: &'static str,
    /// Format of the example's source
    pub format: DiagramFormat,
}

/// Returns all examples with their display names.
pub const fn all_examples() -> &'static [ExampleInfo] {
    const EXAMPLES: &[ExampleInfo] = &[
        ExampleInfo {
            kind: ExampleKind::SimpleFlowchart,
            name: "Simple Flowchart",
            description: "Basic flowchart with a decision node",
            format: DiagramFormat::Excalidraw,
        },
        ExampleInfo {
            kind: ExampleKind::UserAuthentication,
            name: "User Authentication",
            description: "Login flow with validation",
            format: DiagramFormat::Excalidraw,
        },
        ExampleInfo {
            kind: ExampleKind::CiPipeline,
            name: "CI/CD Pipeline",
            description: "Continuous integration workflow",
            format: DiagramFormat::DrawIo,
        },
        ExampleInfo {
            kind: ExampleKind::DatabaseSchema,
            name: "Database Schema",
            description: "Services and the tables they own",
            format: DiagramFormat::DrawIo,
        },
    ];
    EXAMPLES
}

/// Returns the source document for the given example kind.
pub fn example_source(kind: ExampleKind) -> &'static str {
    match kind {
        ExampleKind::SimpleFlowchart => SIMPLE_FLOWCHART,
        ExampleKind::UserAuthentication => USER_AUTHENTICATION,
        ExampleKind::CiPipeline => CI_PIPELINE,
        ExampleKind::DatabaseSchema => DATABASE_SCHEMA,
    }
}

const SIMPLE_FLOWCHART: &str = r##"{
  "type": "excalidraw",
  "version": 2,
  "elements": [
    {"id": "start", "type": "ellipse", "x": 0, "y": 40, "width": 120, "height": 60,
     "backgroundColor": "#b2f2bb", "strokeColor": "#2f9e44"},
    {"id": "start-label", "type": "text", "x": 30, "y": 60, "text": "Start", "fontSize": 16, "containerId": "start"},
    {"id": "decision", "type": "diamond", "x": 200, "y": 20, "width": 120, "height": 100,
     "backgroundColor": "transparent", "strokeColor": "transparent"},
    {"id": "decision-label", "type": "text", "x": 230, "y": 60, "text": "Decision", "fontSize": 16, "containerId": "decision"},
    {"id": "process", "type": "rectangle", "x": 420, "y": 0, "width": 140, "height": 60,
     "backgroundColor": "#a5d8ff", "strokeColor": "#1971c2", "roundness": {"type": 3}},
    {"id": "process-label", "type": "text", "x": 450, "y": 20, "text": "Process", "fontSize": 16, "containerId": "process"},
    {"id": "end", "type": "rectangle", "x": 420, "y": 120, "width": 140, "height": 60},
    {"id": "end-label", "type": "text", "x": 450, "y": 140, "text": "End", "fontSize": 16, "containerId": "end"},
    {"id": "a1", "type": "arrow", "x": 120, "y": 70, "width": 80, "height": 0, "points": [[0, 0], [80, 0]]},
    {"id": "a2", "type": "arrow", "x": 320, "y": 60, "width": 100, "height": 30, "points": [[0, 0], [100, -30]]},
    {"id": "a2-label", "type": "text", "x": 350, "y": 35, "text": "Yes", "fontSize": 14, "containerId": "a2"},
    {"id": "a3", "type": "arrow", "x": 320, "y": 80, "width": 100, "height": 70, "points": [[0, 0], [100, 70]]},
    {"id": "a3-label", "type": "text", "x": 350, "y": 105, "text": "No", "fontSize": 14, "containerId": "a3"},
    {"id": "a4", "type": "arrow", "x": 490, "y": 60, "width": 0, "height": 60, "points": [[0, 0], [0, 60]]}
  ],
  "appState": {"viewBackgroundColor": "#ffffff"}
}"##;

const USER_AUTHENTICATION: &str = r##"{
  "type": "excalidraw",
  "version": 2,
  "elements": [
    {"id": "user", "type": "ellipse", "x": 0, "y": 0, "width": 120, "height": 60},
    {"id": "user-label", "type": "text", "text": "User", "fontSize": 16, "containerId": "user"},
    {"id": "login", "type": "rectangle", "x": 0, "y": 120, "width": 120, "height": 60, "roundness": {"type": 3}},
    {"id": "login-label", "type": "text", "text": "Login Page", "fontSize": 16, "containerId": "login"},
    {"id": "valid", "type": "diamond", "x": -10, "y": 240, "width": 140, "height": 100},
    {"id": "valid-label", "type": "text", "text": "Valid\nCredentials?", "fontSize": 16, "containerId": "valid"},
    {"id": "dashboard", "type": "rectangle", "x": -160, "y": 400, "width": 140, "height": 60,
     "backgroundColor": "#b2f2bb", "strokeColor": "#2f9e44"},
    {"id": "dashboard-label", "type": "text", "text": "Dashboard", "fontSize": 16, "containerId": "dashboard"},
    {"id": "error", "type": "rectangle", "x": 160, "y": 400, "width": 140, "height": 60,
     "backgroundColor": "#ffc9c9", "strokeColor": "#e03131"},
    {"id": "error-label", "type": "text", "text": "Error Message", "fontSize": 16, "containerId": "error"},
    {"id": "a1", "type": "arrow", "x": 60, "y": 60, "points": [[0, 0], [0, 60]]},
    {"id": "a2", "type": "arrow", "x": 60, "y": 180, "points": [[0, 0], [0, 60]]},
    {"id": "a3", "type": "arrow", "x": 20, "y": 320, "points": [[0, 0], [-110, 80]]},
    {"id": "a3-label", "type": "text", "text": "Yes", "fontSize": 14, "containerId": "a3"},
    {"id": "a4", "type": "arrow", "x": 100, "y": 320, "points": [[0, 0], [130, 80]]},
    {"id": "a4-label", "type": "text", "text": "No", "fontSize": 14, "containerId": "a4"},
    {"id": "a5", "type": "arrow", "x": 230, "y": 400, "points": [[0, 0], [-110, -250]]},
    {"id": "note", "type": "text", "x": -160, "y": 500, "text": "Sessions expire after 30 minutes", "fontSize": 14},
    {"id": "scratch", "type": "freedraw", "x": 300, "y": 0, "points": [[0, 0], [4, 4]]},
    {"id": "old", "type": "rectangle", "x": 900, "y": 900, "isDeleted": true}
  ]
}"##;

const CI_PIPELINE: &str = r#"<mxfile host="app.diagrams.net">
  <diagram id="pipeline" name="CI/CD Pipeline">
    <mxGraphModel dx="1000" dy="600" grid="1" gridSize="10">
      <root>
        <mxCell id="0"/>
        <mxCell id="1" parent="0"/>
        <mxCell id="push" value="Code Push" style="ellipse;whiteSpace=wrap;html=1;" vertex="1" parent="1">
          <mxGeometry x="0" y="80" width="120" height="60" as="geometry"/>
        </mxCell>
        <mxCell id="build" value="Build" style="rounded=1;whiteSpace=wrap;html=1;" vertex="1" parent="1">
          <mxGeometry x="180" y="80" width="120" height="60" as="geometry"/>
        </mxCell>
        <mxCell id="test" value="Test" style="rounded=1;whiteSpace=wrap;html=1;" vertex="1" parent="1">
          <mxGeometry x="360" y="80" width="120" height="60" as="geometry"/>
        </mxCell>
        <mxCell id="pass" value="Tests Pass?" style="rhombus;whiteSpace=wrap;html=1;" vertex="1" parent="1">
          <mxGeometry x="540" y="60" width="120" height="100" as="geometry"/>
        </mxCell>
        <mxCell id="staging" value="Deploy Staging" style="rounded=1;whiteSpace=wrap;html=1;" vertex="1" parent="1">
          <mxGeometry x="720" y="0" width="140" height="60" as="geometry"/>
        </mxCell>
        <mxCell id="notify" value="Notify Developer" style="whiteSpace=wrap;html=1;" vertex="1" parent="1">
          <mxGeometry x="720" y="180" width="140" height="60" as="geometry"/>
        </mxCell>
        <mxCell id="prod" value="Deploy Production" style="rounded=1;whiteSpace=wrap;html=1;" vertex="1" parent="1">
          <mxGeometry x="920" y="0" width="140" height="60" as="geometry"/>
        </mxCell>
        <mxCell id="e1" edge="1" source="push" target="build" parent="1">
          <mxGeometry relative="1" as="geometry"/>
        </mxCell>
        <mxCell id="e2" edge="1" source="build" target="test" parent="1">
          <mxGeometry relative="1" as="geometry"/>
        </mxCell>
        <mxCell id="e3" edge="1" source="test" target="pass" parent="1">
          <mxGeometry relative="1" as="geometry"/>
        </mxCell>
        <mxCell id="e4" value="Yes" edge="1" source="pass" target="staging" parent="1">
          <mxGeometry relative="1" as="geometry"/>
        </mxCell>
        <mxCell id="e5" value="No" edge="1" source="pass" target="notify" parent="1">
          <mxGeometry relative="1" as="geometry"/>
        </mxCell>
        <mxCell id="e6" value="QA Approved" edge="1" source="staging" target="prod" parent="1">
          <mxGeometry relative="1" as="geometry"/>
        </mxCell>
      </root>
    </mxGraphModel>
  </diagram>
</mxfile>"#;

const DATABASE_SCHEMA: &str = r#"<mxGraphModel>
  <root>
    <mxCell id="0"/>
    <mxCell id="1" parent="0"/>
    <UserObject label="API Gateway" id="gateway">
      <mxCell style="rounded=1;whiteSpace=wrap;html=1;" vertex="1" parent="1">
        <mxGeometry x="0" y="100" width="140" height="60" as="geometry"/>
      </mxCell>
    </UserObject>
    <mxCell id="users-svc" value="User Service" style="whiteSpace=wrap;html=1;" vertex="1" parent="1">
      <mxGeometry x="220" y="20" width="140" height="60" as="geometry"/>
    </mxCell>
    <mxCell id="orders-svc" value="Order Service" style="whiteSpace=wrap;html=1;" vertex="1" parent="1">
      <mxGeometry x="220" y="180" width="140" height="60" as="geometry"/>
    </mxCell>
    <mxCell id="users-db" value="Users" style="shape=cylinder3;whiteSpace=wrap;html=1;boundedLbl=1;" vertex="1" parent="1">
      <mxGeometry x="440" y="10" width="80" height="80" as="geometry"/>
    </mxCell>
    <mxCell id="orders-db" value="Orders" style="shape=cylinder3;whiteSpace=wrap;html=1;boundedLbl=1;" vertex="1" parent="1">
      <mxGeometry x="440" y="170" width="80" height="80" as="geometry"/>
    </mxCell>
    <mxCell id="e1" value="/users" edge="1" source="gateway" target="users-svc" parent="1">
      <mxGeometry relative="1" as="geometry"/>
    </mxCell>
    <mxCell id="e2" value="/orders" edge="1" source="gateway" target="orders-svc" parent="1">
      <mxGeometry relative="1" as="geometry"/>
    </mxCell>
    <mxCell id="e3" edge="1" source="users-svc" target="users-db" parent="1">
      <mxGeometry relative="1" as="geometry"/>
    </mxCell>
    <mxCell id="e4" edge="1" source="orders-svc" target="orders-db" parent="1">
      <mxGeometry relative="1" as="geometry"/>
    </mxCell>
  </root>
</mxGraphModel>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Preview;

    #[test]
    fn every_example_renders() {
        for info in all_examples() {
            let source = example_source(info.kind);
            assert_eq!(DiagramFormat::detect(source), Some(info.format), "{}", info.name);
            match Preview::from_source(source, Some(info.format)) {
                Preview::Ready(diagram) => {
                    assert!(diagram.width > 0.0 && diagram.height > 0.0);
                    assert!(diagram.markup.starts_with("<svg"));
                }
                other => panic!("{} did not render: {:?}", info.name, other),
            }
        }
    }

    #[test]
    fn example_labels_reach_the_markup() {
        let preview = Preview::from_source(example_source(ExampleKind::DatabaseSchema), None);
        let markup = &preview.diagram().unwrap().markup;
        assert!(markup.contains(">API Gateway</text>"));
        assert_eq!(markup.matches("marker-end").count(), 4);

        let preview = Preview::from_source(example_source(ExampleKind::UserAuthentication), None);
        let markup = &preview.diagram().unwrap().markup;
        assert!(markup.contains(">Credentials?</tspan>"));
        assert!(!markup.contains("freedraw"));
    }
}
