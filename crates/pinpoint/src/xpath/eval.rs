//! Evaluation of parsed XPath expressions against a scraper tree.

use std::collections::{HashMap, HashSet};

use ego_tree::{NodeId, NodeRef};
use scraper::Node;

use super::parser::{Axis, CompareOp, Expr, Function, LocationPath, NodeTest, PathStart, Step};

/// A member of a node-set: a tree node or an attribute of an element.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Item<'a> {
    Node(NodeRef<'a, Node>),
    Attr {
        owner: NodeRef<'a, Node>,
        index: usize,
        value: &'a str,
    },
}

impl<'a> Item<'a> {
    fn key(&self) -> (NodeId, Option<usize>) {
        match self {
            Self::Node(node) => (node.id(), None),
            Self::Attr { owner, index, .. } => (owner.id(), Some(*index)),
        }
    }

    fn string_value(&self) -> String {
        match self {
            Self::Node(node) => node_string(*node),
            Self::Attr { value, .. } => (*value).to_string(),
        }
    }

    /// Element behind this item, if it is one.
    pub(crate) fn as_node(&self) -> Option<NodeRef<'a, Node>> {
        match self {
            Self::Node(node) => Some(*node),
            Self::Attr { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
enum Value<'a> {
    Set(Vec<Item<'a>>),
    Str(String),
    Num(f64),
    Bool(bool),
}

/// Scalar operand of a comparison
#[derive(Debug, Clone)]
enum Atom {
    Str(String),
    Num(f64),
    Bool(bool),
}

impl Atom {
    fn as_bool(&self) -> bool {
        match self {
            Self::Str(s) => !s.is_empty(),
            Self::Num(n) => *n != 0.0 && !n.is_nan(),
            Self::Bool(b) => *b,
        }
    }

    fn as_number(&self) -> f64 {
        match self {
            Self::Str(s) => parse_number(s),
            Self::Num(n) => *n,
            Self::Bool(b) => f64::from(u8::from(*b)),
        }
    }

    fn as_string(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Num(n) => format_number(*n),
            Self::Bool(b) => b.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Context<'a> {
    item: Item<'a>,
    position: usize,
    size: usize,
}

/// Evaluates expressions over one document.
#[derive(Debug)]
pub(crate) struct Evaluator<'a> {
    root: NodeRef<'a, Node>,
    order: HashMap<NodeId, usize>,
}

impl<'a> Evaluator<'a> {
    pub(crate) fn new(root: NodeRef<'a, Node>) -> Self {
        let order = root
            .descendants()
            .enumerate()
            .map(|(index, node)| (node.id(), index))
            .collect();
        Self { root, order }
    }

    /// Evaluate a top-level expression; `None` when it is not a node-set.
    pub(crate) fn select(&self, expr: &Expr) -> Option<Vec<Item<'a>>> {
        let ctx = Context {
            item: Item::Node(self.root),
            position: 1,
            size: 1,
        };
        match self.eval(expr, &ctx) {
            Value::Set(items) => Some(self.normalize(items)),
            _ => None,
        }
    }

    fn eval(&self, expr: &Expr, ctx: &Context<'a>) -> Value<'a> {
        match expr {
            Expr::Or(left, right) => {
                Value::Bool(self.truthy(left, ctx) || self.truthy(right, ctx))
            }
            Expr::And(left, right) => {
                Value::Bool(self.truthy(left, ctx) && self.truthy(right, ctx))
            }
            Expr::Compare(op, left, right) => {
                let left = self.eval(left, ctx);
                let right = self.eval(right, ctx);
                Value::Bool(compare(*op, &left, &right))
            }
            Expr::Union(branches) => {
                let mut items = Vec::new();
                for branch in branches {
                    if let Value::Set(set) = self.eval(branch, ctx) {
                        items.extend(set);
                    }
                }
                Value::Set(self.normalize(items))
            }
            Expr::Path(path) => Value::Set(self.eval_path(path, ctx)),
            Expr::Filter(base, predicates) => match self.eval(base, ctx) {
                Value::Set(items) => {
                    let items = self.normalize(items);
                    Value::Set(self.apply_predicates(items, predicates))
                }
                _ => Value::Set(Vec::new()),
            },
            Expr::Literal(value) => Value::Str(value.clone()),
            Expr::Number(value) => Value::Num(*value),
            Expr::Call(function, args) => self.call(*function, args, ctx),
        }
    }

    fn truthy(&self, expr: &Expr, ctx: &Context<'a>) -> bool {
        boolean(&self.eval(expr, ctx))
    }

    fn string_arg(&self, args: &[Expr], index: usize, ctx: &Context<'a>) -> String {
        args.get(index).map_or_else(
            || ctx.item.string_value(),
            |expr| atom(&self.eval(expr, ctx)).as_string(),
        )
    }

    fn call(&self, function: Function, args: &[Expr], ctx: &Context<'a>) -> Value<'a> {
        match function {
            Function::Position => Value::Num(ctx.position as f64),
            Function::Last => Value::Num(ctx.size as f64),
            Function::Count => match args.first().map(|arg| self.eval(arg, ctx)) {
                Some(Value::Set(items)) => Value::Num(items.len() as f64),
                _ => Value::Num(f64::NAN),
            },
            Function::Contains => {
                let haystack = self.string_arg(args, 0, ctx);
                let needle = self.string_arg(args, 1, ctx);
                Value::Bool(haystack.contains(&needle))
            }
            Function::StartsWith => {
                let haystack = self.string_arg(args, 0, ctx);
                let prefix = self.string_arg(args, 1, ctx);
                Value::Bool(haystack.starts_with(&prefix))
            }
            Function::NormalizeSpace => {
                let value = self.string_arg(args, 0, ctx);
                Value::Str(value.split_whitespace().collect::<Vec<_>>().join(" "))
            }
            Function::Concat => Value::Str(
                (0..args.len())
                    .map(|index| self.string_arg(args, index, ctx))
                    .collect(),
            ),
            Function::Not => Value::Bool(!args.first().is_some_and(|arg| self.truthy(arg, ctx))),
            Function::String => Value::Str(self.string_arg(args, 0, ctx)),
            Function::StringLength => {
                Value::Num(self.string_arg(args, 0, ctx).chars().count() as f64)
            }
            Function::True => Value::Bool(true),
            Function::False => Value::Bool(false),
            Function::Name => {
                let item = match args.first().map(|arg| self.eval(arg, ctx)) {
                    Some(Value::Set(items)) => self.normalize(items).first().copied(),
                    Some(_) => None,
                    None => Some(ctx.item),
                };
                Value::Str(item.map(|item| self.item_name(item)).unwrap_or_default())
            }
        }
    }

    fn item_name(&self, item: Item<'a>) -> String {
        match item {
            Item::Node(node) => node
                .value()
                .as_element()
                .map(|element| element.name().to_string())
                .unwrap_or_default(),
            Item::Attr { owner, index, .. } => owner
                .value()
                .as_element()
                .and_then(|element| element.attrs().nth(index))
                .map(|(name, _)| name.to_string())
                .unwrap_or_default(),
        }
    }

    fn eval_path(&self, path: &LocationPath, ctx: &Context<'a>) -> Vec<Item<'a>> {
        let mut current = match &path.start {
            PathStart::Root => vec![Item::Node(self.root)],
            PathStart::Context => vec![ctx.item],
            PathStart::Filter(expr) => match self.eval(expr, ctx) {
                Value::Set(items) => items,
                _ => return Vec::new(),
            },
        };

        for step in &path.steps {
            let mut next = Vec::new();
            let mut seen = HashSet::new();
            for item in &current {
                let candidates = self.axis_items(step, *item);
                for found in self.apply_predicates(candidates, &step.predicates) {
                    if seen.insert(found.key()) {
                        next.push(found);
                    }
                }
            }
            self.sort(&mut next);
            current = next;
        }
        current
    }

    /// Nodes on the step's axis that pass its node test, in axis order.
    fn axis_items(&self, step: &Step, item: Item<'a>) -> Vec<Item<'a>> {
        let node = match item {
            Item::Node(node) => node,
            Item::Attr { owner, .. } => {
                return match step.axis {
                    Axis::Parent if node_matches(&step.test, owner) => vec![Item::Node(owner)],
                    Axis::SelfNode if step.test == NodeTest::AnyNode => vec![item],
                    _ => Vec::new(),
                };
            }
        };

        if step.axis == Axis::Attribute {
            let Some(element) = node.value().as_element() else {
                return Vec::new();
            };
            return element
                .attrs()
                .enumerate()
                .filter(|(_, (name, _))| attr_matches(&step.test, name))
                .map(|(index, (_, value))| Item::Attr {
                    owner: node,
                    index,
                    value,
                })
                .collect();
        }

        let nodes: Vec<NodeRef<'a, Node>> = match step.axis {
            Axis::Child => node.children().collect(),
            Axis::Descendant => node.descendants().skip(1).collect(),
            Axis::DescendantOrSelf => node.descendants().collect(),
            Axis::SelfNode => vec![node],
            Axis::Parent => node.parent().into_iter().collect(),
            Axis::Ancestor => node.ancestors().collect(),
            Axis::AncestorOrSelf => std::iter::once(node).chain(node.ancestors()).collect(),
            Axis::FollowingSibling => node.next_siblings().collect(),
            Axis::PrecedingSibling => node.prev_siblings().collect(),
            Axis::Attribute => Vec::new(),
        };
        nodes
            .into_iter()
            .filter(|candidate| node_matches(&step.test, *candidate))
            .map(Item::Node)
            .collect()
    }

    fn apply_predicates(&self, mut items: Vec<Item<'a>>, predicates: &[Expr]) -> Vec<Item<'a>> {
        for predicate in predicates {
            let size = items.len();
            items = items
                .into_iter()
                .enumerate()
                .filter(|(index, item)| {
                    let ctx = Context {
                        item: *item,
                        position: index + 1,
                        size,
                    };
                    match self.eval(predicate, &ctx) {
                        Value::Num(n) => n == ctx.position as f64,
                        other => boolean(&other),
                    }
                })
                .map(|(_, item)| item)
                .collect();
        }
        items
    }

    fn order_key(&self, item: &Item<'a>) -> (usize, usize) {
        let (id, attr) = item.key();
        let index = self.order.get(&id).copied().unwrap_or(usize::MAX);
        (index, attr.map_or(0, |a| a + 1))
    }

    fn sort(&self, items: &mut [Item<'a>]) {
        items.sort_by_key(|item| self.order_key(item));
    }

    fn normalize(&self, mut items: Vec<Item<'a>>) -> Vec<Item<'a>> {
        self.sort(&mut items);
        let mut seen = HashSet::new();
        items.retain(|item| seen.insert(item.key()));
        items
    }
}

fn node_matches(test: &NodeTest, node: NodeRef<'_, Node>) -> bool {
    match test {
        NodeTest::AnyNode => true,
        NodeTest::Text => node.value().is_text(),
        NodeTest::AnyName => node.value().is_element(),
        NodeTest::Name(name) => node
            .value()
            .as_element()
            .is_some_and(|element| element.name().eq_ignore_ascii_case(local_part(name))),
    }
}

fn attr_matches(test: &NodeTest, attr_name: &str) -> bool {
    match test {
        NodeTest::AnyNode | NodeTest::AnyName => true,
        NodeTest::Text => false,
        NodeTest::Name(name) => attr_name.eq_ignore_ascii_case(local_part(name)),
    }
}

fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

fn node_string(node: NodeRef<'_, Node>) -> String {
    match node.value() {
        Node::Text(text) => String::from(&**text),
        Node::Comment(comment) => String::from(&*comment.comment),
        _ => node
            .descendants()
            .filter_map(|descendant| descendant.value().as_text())
            .map(|text| &**text)
            .collect(),
    }
}

/// Collapse a value to a scalar for string and number use (node-sets take
/// the string value of their first member, an empty set is `""`).
fn atom(value: &Value<'_>) -> Atom {
    match value {
        Value::Set(items) => Atom::Str(items.first().map(Item::string_value).unwrap_or_default()),
        Value::Str(s) => Atom::Str(s.clone()),
        Value::Num(n) => Atom::Num(*n),
        Value::Bool(b) => Atom::Bool(*b),
    }
}

/// Boolean context: a node-set is true when non-empty.
fn boolean(value: &Value<'_>) -> bool {
    match value {
        Value::Set(items) => !items.is_empty(),
        other => atom(other).as_bool(),
    }
}

fn compare(op: CompareOp, left: &Value<'_>, right: &Value<'_>) -> bool {
    match (left, right) {
        (Value::Set(a), Value::Set(b)) => {
            let right_strings: Vec<String> = b.iter().map(Item::string_value).collect();
            a.iter().any(|x| {
                let left = Atom::Str(x.string_value());
                right_strings
                    .iter()
                    .any(|y| compare_atoms(op, &left, &Atom::Str(y.clone())))
            })
        }
        (Value::Set(a), Value::Bool(b)) => {
            compare_atoms(op, &Atom::Bool(!a.is_empty()), &Atom::Bool(*b))
        }
        (Value::Bool(b), Value::Set(a)) => {
            compare_atoms(op, &Atom::Bool(*b), &Atom::Bool(!a.is_empty()))
        }
        (Value::Set(a), scalar) => {
            let right = atom(scalar);
            a.iter()
                .any(|x| compare_atoms(op, &Atom::Str(x.string_value()), &right))
        }
        (scalar, Value::Set(b)) => {
            let left = atom(scalar);
            b.iter()
                .any(|y| compare_atoms(op, &left, &Atom::Str(y.string_value())))
        }
        (left, right) => compare_atoms(op, &atom(left), &atom(right)),
    }
}

fn compare_atoms(op: CompareOp, left: &Atom, right: &Atom) -> bool {
    match op {
        CompareOp::Eq | CompareOp::Ne => {
            let equal = match (left, right) {
                (Atom::Bool(_), _) | (_, Atom::Bool(_)) => left.as_bool() == right.as_bool(),
                (Atom::Num(_), _) | (_, Atom::Num(_)) => left.as_number() == right.as_number(),
                _ => left.as_string() == right.as_string(),
            };
            (op == CompareOp::Eq) == equal
        }
        CompareOp::Lt => left.as_number() < right.as_number(),
        CompareOp::Le => left.as_number() <= right.as_number(),
        CompareOp::Gt => left.as_number() > right.as_number(),
        CompareOp::Ge => left.as_number() >= right.as_number(),
    }
}

fn parse_number(value: &str) -> f64 {
    let trimmed = value.trim();
    let valid = !trimmed.is_empty()
        && trimmed
            .trim_start_matches('-')
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.');
    if valid {
        trimmed.parse().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_accepts_xpath_numbers() {
        assert_eq!(parse_number(" 42 "), 42.0);
        assert_eq!(parse_number("-1.5"), -1.5);
        assert!(parse_number("1e3").is_nan());
        assert!(parse_number("abc").is_nan());
        assert!(parse_number("").is_nan());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
    }

    #[test]
    fn test_compare_atoms_type_coercion() {
        let one = Atom::Str("1".into());
        assert!(compare_atoms(CompareOp::Eq, &one, &Atom::Num(1.0)));
        assert!(compare_atoms(CompareOp::Eq, &one, &Atom::Bool(true)));
        assert!(compare_atoms(CompareOp::Ne, &one, &Atom::Str("01".into())));
        assert!(compare_atoms(CompareOp::Lt, &one, &Atom::Num(2.0)));
        assert!(!compare_atoms(CompareOp::Eq, &Atom::Num(f64::NAN), &Atom::Num(f64::NAN)));
    }

    #[test]
    fn test_local_part() {
        assert_eq!(local_part("svg:rect"), "rect");
        assert_eq!(local_part("div"), "div");
    }
}
