//! Conformance test fixture runner
//!
//! Loads YAML fixtures (a tree, lookup tables and cases) and runs each case's
//! matcher through the compiler and the walk-list runtime.

use crate::{TestTree, TestTreeBuilder};
use serde::Deserialize;
use std::collections::BTreeMap;
use uawalk::prelude::*;
use uawalk::WalkListError;

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub tree: TreeSpec,
    #[serde(default)]
    pub lookups: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    pub sets: BTreeMap<String, Vec<String>>,
    pub cases: Vec<TestCase>,
}

/// A tree node as written in YAML.
///
/// Leaves carry `text`; interior nodes carry `children` (and optionally an
/// explicit `text`). `separator: true` marks separator tokens.
#[derive(Debug, Deserialize)]
pub struct TreeSpec {
    pub name: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub separator: bool,
    #[serde(default)]
    pub children: Vec<TreeSpec>,
}

/// Test case
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub matcher: MatcherExpr,
    /// Path of the node the walk starts from (defaults to the root).
    #[serde(default)]
    pub start: Option<String>,
    /// Value handed to the first step.
    #[serde(default)]
    pub value: Option<String>,
    /// Expected rendering of every compiled step, in order.
    #[serde(default)]
    pub steps: Option<Vec<String>>,
    /// Expected effective value of the hit.
    #[serde(default)]
    pub expect: Option<String>,
    /// Expected path of the node the walk ends on.
    #[serde(default)]
    pub expect_node: Option<String>,
    /// The walk must miss.
    #[serde(default)]
    pub miss: bool,
    /// Compilation must fail on this lookup or set name.
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub uses_is_null: Option<bool>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Builder: Convert fixture data to uawalk types
// ═══════════════════════════════════════════════════════════════════════════════

impl TreeSpec {
    /// Build the arena tree.
    pub fn build(&self) -> TestTree {
        let mut builder = TestTree::builder(&self.name);
        if let Some(text) = &self.text {
            builder = builder.text(text);
        }
        self.children
            .iter()
            .fold(builder, |b, child| child.add_to(b))
            .build()
    }

    fn add_to(&self, builder: TestTreeBuilder) -> TestTreeBuilder {
        if self.separator {
            return builder.separator(self.text.clone().unwrap_or_default());
        }
        if self.children.is_empty() {
            return builder.leaf(&self.name, self.text.clone().unwrap_or_default());
        }
        let mut builder = builder.open(&self.name);
        if let Some(text) = &self.text {
            builder = builder.text(text);
        }
        self.children
            .iter()
            .fold(builder, |b, child| child.add_to(b))
            .close()
    }
}

impl Fixture {
    /// Build the lookup tables.
    pub fn build_lookups(&self) -> Lookups {
        let builder = self
            .lookups
            .iter()
            .fold(Lookups::builder(), |b, (name, entries)| {
                b.lookup(name, entries.iter().map(|(k, v)| (k, v.clone())))
            });
        self.sets
            .iter()
            .fold(builder, |b, (name, members)| b.set(name, members))
            .build()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
}

impl TestCase {
    fn run(&self, tree: &TestTree, lookups: &Lookups) -> CaseResult {
        let outcome = self.check(tree, lookups);
        let (passed, expected, actual) = match outcome {
            Ok(()) => (true, String::new(), String::new()),
            Err((expected, actual)) => (false, expected, actual),
        };
        CaseResult {
            case_name: self.name.clone(),
            passed,
            expected,
            actual,
        }
    }

    /// `Err((expected, actual))` on the first mismatch.
    fn check(&self, tree: &TestTree, lookups: &Lookups) -> Result<(), (String, String)> {
        let compiled = WalkList::new(&self.matcher, lookups, false);

        if let Some(name) = &self.error {
            return match compiled {
                Err(err) if err.name() == name => Ok(()),
                Err(err) => Err((format!("error on {name:?}"), err.to_string())),
                Ok(list) => Err((format!("error on {name:?}"), format!("compiled{list}"))),
            };
        }
        let list = compiled.map_err(|err: WalkListError| ("compiled".to_owned(), err.to_string()))?;

        if let Some(steps) = &self.steps {
            let actual: Vec<String> = list.steps().iter().map(ToString::to_string).collect();
            if &actual != steps {
                return Err((format!("steps {steps:?}"), format!("steps {actual:?}")));
            }
        }
        if let Some(expected) = self.uses_is_null {
            if list.uses_is_null() != expected {
                return Err((
                    format!("uses_is_null={expected}"),
                    format!("uses_is_null={}", !expected),
                ));
            }
        }

        let start = match &self.start {
            Some(path) => tree
                .find(path)
                .ok_or_else(|| (format!("start node {path}"), "no such node".to_owned()))?,
            None => tree.root(),
        };
        let result = list.walk(start, self.value.as_deref());

        match result {
            None if self.miss => Ok(()),
            None => Err((self.describe_hit(), "miss".to_owned())),
            Some(hit) if self.miss => Err(("miss".to_owned(), hit.to_string())),
            Some(hit) => {
                let value_ok = self
                    .expect
                    .as_deref()
                    .map_or(true, |e| hit.effective_value() == e);
                let node_ok = self
                    .expect_node
                    .as_deref()
                    .map_or(true, |p| hit.node().path() == p);
                if value_ok && node_ok {
                    Ok(())
                } else {
                    Err((
                        self.describe_hit(),
                        format!("{} at {}", hit.effective_value(), hit.node().path()),
                    ))
                }
            }
        }
    }

    fn describe_hit(&self) -> String {
        format!(
            "{} at {}",
            self.expect.as_deref().unwrap_or("<any>"),
            self.expect_node.as_deref().unwrap_or("<any>")
        )
    }
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Run all test cases and return results
    pub fn run(&self) -> Vec<CaseResult> {
        let tree = self.tree.build();
        let lookups = self.build_lookups();
        self.cases
            .iter()
            .map(|case| case.run(&tree, &lookups))
            .collect()
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self) {
        for result in self.run() {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: expected {}, got {}",
                self.name, result.case_name, result.expected, result.actual
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
name: inline
tree:
  name: agent
  children:
    - name: product
      children:
        - { name: name, text: Firefox }
        - { separator: true, name: separator, text: "/" }
        - { name: version, text: "120.0" }
lookups:
  brands:
    FIREFOX: Mozilla
cases:
  - name: up and down
    start: agent/product/name
    matcher:
      path:
        walk:
          - down: { name: product }
          - down: { name: name }
          - equals: Firefox
          - up
          - down: { name: version }
    steps: ["Up()", "Down([*]version)"]
    expect: "120.0"
    expect_node: agent/product/version
  - name: lookup through map
    start: agent/product/name
    matcher:
      lookup:
        name: brands
        matcher: { path: { walk: [] } }
    expect: Mozilla
  - name: unknown lookup
    matcher:
      lookup:
        name: nope
        matcher: { path: { fixed: x } }
    error: nope
"#;

    #[test]
    fn inline_fixture_passes() {
        let fixture = Fixture::from_yaml(YAML).unwrap();
        assert_eq!(fixture.cases.len(), 3);
        fixture.run_and_assert();
    }

    #[test]
    fn failing_case_is_reported() {
        let mut fixture = Fixture::from_yaml(YAML).unwrap();
        fixture.cases[0].expect = Some("121.0".into());
        let results = fixture.run();
        assert!(!results[0].passed);
        assert_eq!(results[0].actual, "120.0 at agent/product/version");
        assert!(results[1].passed);
    }
}
