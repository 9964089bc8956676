use super::tree::Tree;

/// Serializes a tree to Newick notation, terminated by `;`.
///
/// Leaves whose identifier parses as an integer in `[1, ids.len()]` are
/// rendered with the corresponding original label (1-based lookup into the
/// input id list); any other childless node keeps its literal identifier,
/// which covers the trivial n <= 2 trees. Children render in the order the
/// tree builder attached them, and a root with three children stays flat
/// under a single pair of parentheses, preserving the unrooted
/// trifurcation. Branch lengths use general-precision decimal formatting.
pub fn to_newick(ids: &[Box<str>], tree: &Tree) -> String {
    let mut out = String::new();
    write_subtree(ids, tree, tree.root(), &mut out);
    out.push(';');
    out
}

fn leaf_label<'a>(ids: &'a [Box<str>], id: &'a str) -> &'a str {
    match id.parse::<usize>() {
        Ok(pos) if pos >= 1 && pos <= ids.len() => &ids[pos - 1],
        _ => id,
    }
}

fn needs_quoting(label: &str) -> bool {
    label.chars().any(|ch| {
        ch.is_whitespace() || matches!(ch, ':' | ',' | '(' | ')' | ';' | '[' | ']' | '\'')
    })
}

fn write_label(out: &mut String, label: &str) {
    if label.is_empty() {
        return;
    }
    if needs_quoting(label) {
        out.push('\'');
        for ch in label.chars() {
            if ch == '\'' {
                out.push_str("''");
            } else {
                out.push(ch);
            }
        }
        out.push('\'');
    } else {
        out.push_str(label);
    }
}

fn write_subtree(ids: &[Box<str>], tree: &Tree, idx: usize, out: &mut String) {
    let node = tree.node(idx);

    if node.children.is_empty() {
        write_label(out, leaf_label(ids, node.id.as_str()));
        return;
    }

    out.push('(');
    for (pos, &(child, distance)) in node.children.iter().enumerate() {
        if pos > 0 {
            out.push(',');
        }
        write_subtree(ids, tree, child, out);
        out.push(':');
        out.push_str(&distance.to_string());
    }
    out.push(')');
}
