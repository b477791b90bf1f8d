//! Plain-text rendering of a composite summary.

use cfgmodel::{BindingSummary, CompositeSummary};
use std::fmt::Write;

pub fn render_text(summary: &CompositeSummary) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_summary(&mut out, summary);
    out
}

fn write_summary(out: &mut String, summary: &CompositeSummary) -> std::fmt::Result {
    match &summary.target_namespace {
        Some(namespace) => writeln!(out, "Composite: {} ({})", summary.name, namespace)?,
        None => writeln!(out, "Composite: {}", summary.name)?,
    }

    writeln!(out, "Services:")?;
    if summary.services.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for service in &summary.services {
        write_entry(
            out,
            &service.name,
            service.promoted_service.as_deref(),
            service.interface.as_deref(),
            &service.bindings,
            &service.policy_requirements,
        )?;
    }

    writeln!(out, "References:")?;
    if summary.references.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for reference in &summary.references {
        write_entry(
            out,
            &reference.name,
            reference.promoted_reference.as_deref(),
            reference.interface.as_deref(),
            &reference.bindings,
            &reference.policy_requirements,
        )?;
    }
    Ok(())
}

fn write_entry(
    out: &mut String,
    name: &str,
    promotes: Option<&str>,
    interface: Option<&str>,
    bindings: &[BindingSummary],
    requires: &[String],
) -> std::fmt::Result {
    match promotes {
        Some(target) => writeln!(out, "  {} -> {}", name, target)?,
        None => writeln!(out, "  {}", name)?,
    }
    if let Some(interface) = interface {
        writeln!(out, "    interface: {}", interface)?;
    }
    for binding in bindings {
        let kind = binding.binding_type.as_deref().unwrap_or("binding");
        match (&binding.name, &binding.uri) {
            (Some(name), Some(uri)) => writeln!(out, "    binding: {} ({}) {}", name, kind, uri)?,
            (Some(name), None) => writeln!(out, "    binding: {} ({})", name, kind)?,
            (None, Some(uri)) => writeln!(out, "    binding: ({}) {}", kind, uri)?,
            (None, None) => writeln!(out, "    binding: ({})", kind)?,
        }
    }
    if !requires.is_empty() {
        writeln!(out, "    requires: {}", requires.join(" "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfgmodel::{CompositeModel, Descriptor};
    use std::sync::Arc;

    #[test]
    fn test_render_text() {
        let composite = CompositeModel::parse(
            r#"<composite name="orders">
                 <service name="Orders" promote="OrderComponent">
                   <interface.java interface="org.example.Orders"/>
                   <binding.soap name="soap" uri="http://localhost/orders"/>
                 </service>
                 <component name="OrderComponent"><service name="Orders"/></component>
                 <reference name="Audit" requires="transaction authorization">
                   <binding.sca/>
                 </reference>
               </composite>"#,
            Arc::new(Descriptor::sca()),
        )
        .unwrap();
        let summary = CompositeSummary::from_model(&composite).unwrap();

        insta::assert_snapshot!(render_text(&summary), @r"
        Composite: orders
        Services:
          Orders -> OrderComponent
            interface: org.example.Orders
            binding: soap (soap) http://localhost/orders
        References:
          Audit
            binding: (sca)
            requires: authorization transaction
        ");
    }
}
