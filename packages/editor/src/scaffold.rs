//! # Scaffold
//!
//! Minimal component source for a page that does not exist in the store yet.
//! The new content is placed verbatim inside the component's `return (...)`,
//! so extracting the scaffold yields that content again.

/// PascalCase component name derived from a page title
pub fn component_name(title: &str) -> String {
    let mut name: String = title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();

    if name.is_empty() {
        return "Page".to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert_str(0, "Page");
    }
    name
}

/// Synthesize a default-exported component returning `content`
pub fn scaffold(title: &str, content: &str) -> String {
    format!(
        "export default function {}() {{\n  return (\n{}\n  );\n}}\n",
        component_name(title),
        content
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_name() {
        assert_eq!(component_name("Foo"), "Foo");
        assert_eq!(component_name("about us"), "AboutUs");
        assert_eq!(component_name("  pricing-plans!  "), "PricingPlans");
        assert_eq!(component_name("404 page"), "Page404Page");
        assert_eq!(component_name("***"), "Page");
        assert_eq!(component_name(""), "Page");
    }

    #[test]
    fn test_scaffold_shape() {
        let source = scaffold("Contact", "<p>Say hi</p>");
        assert_eq!(
            source,
            "export default function Contact() {\n  return (\n<p>Say hi</p>\n  );\n}\n"
        );
    }
}
