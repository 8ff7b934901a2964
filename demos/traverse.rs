use std::cell::RefCell;
use std::rc::Rc;

use visitset::Set;

struct Node {
    name: String,
    edges: RefCell<Vec<Rc<Node>>>,
}

fn node(name: &str) -> Rc<Node> {
    Rc::new(Node {
        name: name.to_string(),
        edges: RefCell::new(Vec::new()),
    })
}

fn walk(root: &Rc<Node>, seen: &mut Set) -> Vec<String> {
    let mut names = Vec::new();
    let mut stack = vec![Rc::clone(root)];
    while let Some(n) = stack.pop() {
        if !seen.add_addr(&*n) {
            continue;
        }
        names.push(n.name.clone());
        stack.extend(n.edges.borrow().iter().rev().cloned());
    }
    names
}

fn main() {
    let a = node("a");
    let b = node("b");
    let c = node("c");
    a.edges.borrow_mut().extend([Rc::clone(&b), Rc::clone(&c)]);
    b.edges.borrow_mut().push(Rc::clone(&c));
    c.edges.borrow_mut().push(Rc::clone(&a));

    let mut seen = Set::new();
    for root in [&a, &b, &c] {
        seen.reset();
        println!("from {}: {}", root.name, walk(root, &mut seen).join(" -> "));
    }

    // Break the cycles so the nodes are freed.
    for n in [&a, &b, &c] {
        n.edges.borrow_mut().clear();
    }
}
