//! Rotation primitives and the insert/erase rebalancing passes.
//!
//! Rotations are the only operations that change subtree shape; the two
//! fixup passes restore the red-black rules through recoloring and a bounded
//! number of rotations. None of these routines allocates or fails. The root
//! reference lives in the header slot, so all link surgery happens inside
//! the arena.

use super::node::{Color, NodeArena, NodeId, HEADER, NIL};

/// Left-rotate around `x`: x's right child y takes x's place, x becomes
/// y's left child, and y's former left subtree becomes x's right subtree.
///
/// ```text
///       p                 p
///      / \               / \
///     x   d    ==>      y   d
///    / \               / \
///   a   y             x   c
///      / \           / \
///     b   c         a   b
/// ```
pub(super) fn rotate_left<V>(a: &mut NodeArena<V>, x: NodeId) {
    let y = a[x].right;
    let y_left = a[y].left;
    a[x].right = y_left;
    if y_left != NIL {
        a[y_left].parent = x;
    }
    let x_parent = a[x].parent;
    a[y].parent = x_parent;
    if x == a.root() {
        a.set_root(y);
    } else if a.is_left_child(x) {
        a[x_parent].left = y;
    } else {
        a[x_parent].right = y;
    }
    a[y].left = x;
    a[x].parent = y;
}

/// Mirror of [`rotate_left`].
pub(super) fn rotate_right<V>(a: &mut NodeArena<V>, x: NodeId) {
    let y = a[x].left;
    let y_right = a[y].right;
    a[x].left = y_right;
    if y_right != NIL {
        a[y_right].parent = x;
    }
    let x_parent = a[x].parent;
    a[y].parent = x_parent;
    if x == a.root() {
        a.set_root(y);
    } else if a.is_left_child(x) {
        a[x_parent].left = y;
    } else {
        a[x_parent].right = y;
    }
    a[y].right = x;
    a[x].parent = y;
}

/// Restore the red-black rules after `x` has been linked in as a red leaf.
///
/// Walks upward while the new node's parent is red: a red uncle means
/// recolor and continue from the grandparent; a black uncle means at most
/// two rotations finish the repair. The root is forced black on exit.
pub(super) fn insert_fixup<V>(a: &mut NodeArena<V>, mut x: NodeId) {
    a.set_red(x);
    while x != a.root() && a.is_red(a[x].parent) {
        let parent = a[x].parent;
        let grand = a[parent].parent;
        if a.is_left_child(parent) {
            let uncle = a[grand].right;
            if a.is_red(uncle) {
                a.set_black(parent);
                a.set_black(uncle);
                a.set_red(grand);
                x = grand;
            } else {
                if !a.is_left_child(x) {
                    x = a[x].parent;
                    rotate_left(a, x);
                }
                let parent = a[x].parent;
                let grand = a[parent].parent;
                a.set_black(parent);
                a.set_red(grand);
                rotate_right(a, grand);
                break;
            }
        } else {
            let uncle = a[grand].left;
            if a.is_red(uncle) {
                a.set_black(parent);
                a.set_black(uncle);
                a.set_red(grand);
                x = grand;
            } else {
                if a.is_left_child(x) {
                    x = a[x].parent;
                    rotate_right(a, x);
                }
                let parent = a[x].parent;
                let grand = a[parent].parent;
                a.set_black(parent);
                a.set_red(grand);
                rotate_left(a, grand);
                break;
            }
        }
    }
    let root = a.root();
    a.set_black(root);
}

/// Unlink `z` from the tree and restore the red-black rules.
///
/// When `z` has two children its in-order successor is relinked into `z`'s
/// structural position (taking over `z`'s color, so the position keeps its
/// color), which leaves `z`'s slot as the node physically removed — it has
/// at most one child. If the removed color was black, the deficit is walked
/// upward from the replacement child through the four sibling cases. The
/// leftmost/rightmost caches and the root reference are maintained. The
/// caller releases `z`'s slot afterwards.
pub(super) fn erase_rebalance<V>(a: &mut NodeArena<V>, z: NodeId) {
    let y = if a[z].left == NIL || a[z].right == NIL {
        z
    } else {
        a.minimum(a[z].right)
    };
    // x is y's sole child (or NIL); xp tracks x's parent once y is unlinked.
    let mut x = if a[y].left != NIL { a[y].left } else { a[y].right };
    let mut xp;
    let removed_color;

    if y != z {
        // z has two children; y is the minimum of z's right subtree, so
        // y.left is NIL and y replaces z's position wholesale.
        let z_left = a[z].left;
        a[z_left].parent = y;
        a[y].left = z_left;
        if y != a[z].right {
            xp = a[y].parent;
            if x != NIL {
                a[x].parent = xp;
            }
            a[xp].left = x;
            let z_right = a[z].right;
            a[y].right = z_right;
            a[z_right].parent = y;
        } else {
            xp = y;
        }
        if a.root() == z {
            a.set_root(y);
        } else if a.is_left_child(z) {
            let z_parent = a[z].parent;
            a[z_parent].left = y;
        } else {
            let z_parent = a[z].parent;
            a[z_parent].right = y;
        }
        let z_parent = a[z].parent;
        a[y].parent = z_parent;
        removed_color = a[y].color;
        let z_color = a[z].color;
        a[y].color = z_color;
    } else {
        // z has at most one child; x splices directly into z's place.
        xp = a[y].parent;
        if x != NIL {
            a[x].parent = xp;
        }
        if a.root() == z {
            a.set_root(x);
        } else if a.is_left_child(z) {
            a[xp].left = x;
        } else {
            a[xp].right = x;
        }
        if a.leftmost() == z {
            let new_leftmost = if x == NIL { xp } else { a.minimum(x) };
            a.set_leftmost(new_leftmost);
        }
        if a.rightmost() == z {
            let new_rightmost = if x == NIL { xp } else { a.maximum(x) };
            a.set_rightmost(new_rightmost);
        }
        removed_color = a[z].color;
    }

    if removed_color == Color::Black {
        while x != a.root() && !a.is_red(x) {
            if x == a[xp].left {
                let mut sibling = a[xp].right;
                if a.is_red(sibling) {
                    a.set_black(sibling);
                    a.set_red(xp);
                    rotate_left(a, xp);
                    sibling = a[xp].right;
                }
                if !a.is_red(a[sibling].left) && !a.is_red(a[sibling].right) {
                    a.set_red(sibling);
                    x = xp;
                    xp = a[xp].parent;
                } else {
                    if !a.is_red(a[sibling].right) {
                        let near = a[sibling].left;
                        if near != NIL {
                            a.set_black(near);
                        }
                        a.set_red(sibling);
                        rotate_right(a, sibling);
                        sibling = a[xp].right;
                    }
                    let xp_color = a[xp].color;
                    a[sibling].color = xp_color;
                    a.set_black(xp);
                    let far = a[sibling].right;
                    if far != NIL {
                        a.set_black(far);
                    }
                    rotate_left(a, xp);
                    break;
                }
            } else {
                let mut sibling = a[xp].left;
                if a.is_red(sibling) {
                    a.set_black(sibling);
                    a.set_red(xp);
                    rotate_right(a, xp);
                    sibling = a[xp].left;
                }
                if !a.is_red(a[sibling].left) && !a.is_red(a[sibling].right) {
                    a.set_red(sibling);
                    x = xp;
                    xp = a[xp].parent;
                } else {
                    if !a.is_red(a[sibling].left) {
                        let near = a[sibling].right;
                        if near != NIL {
                            a.set_black(near);
                        }
                        a.set_red(sibling);
                        rotate_left(a, sibling);
                        sibling = a[xp].left;
                    }
                    let xp_color = a[xp].color;
                    a[sibling].color = xp_color;
                    a.set_black(xp);
                    let far = a[sibling].left;
                    if far != NIL {
                        a.set_black(far);
                    }
                    rotate_right(a, xp);
                    break;
                }
            }
        }
        if x != NIL {
            a.set_black(x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build `b <- d -> f` with the header wired up as an empty fixup would
    /// leave it.
    fn three_nodes() -> (NodeArena<i32>, NodeId, NodeId, NodeId) {
        let mut a: NodeArena<i32> = NodeArena::new();
        let d = a.allocate(4).unwrap();
        let b = a.allocate(2).unwrap();
        let f = a.allocate(6).unwrap();
        a.set_root(d);
        a.set_leftmost(b);
        a.set_rightmost(f);
        a[d].parent = HEADER;
        a[d].left = b;
        a[d].right = f;
        a[b].parent = d;
        a[f].parent = d;
        a.set_black(d);
        a.set_black(b);
        a.set_black(f);
        (a, d, b, f)
    }

    #[test]
    fn test_rotate_left_relinks() {
        let (mut a, d, b, f) = three_nodes();
        rotate_left(&mut a, d);

        assert_eq!(a.root(), f);
        assert_eq!(a[f].parent, HEADER);
        assert_eq!(a[f].left, d);
        assert_eq!(a[d].parent, f);
        assert_eq!(a[d].left, b);
        assert_eq!(a[d].right, NIL);
    }

    #[test]
    fn test_rotate_right_relinks() {
        let (mut a, d, b, f) = three_nodes();
        rotate_right(&mut a, d);

        assert_eq!(a.root(), b);
        assert_eq!(a[b].parent, HEADER);
        assert_eq!(a[b].right, d);
        assert_eq!(a[d].parent, b);
        assert_eq!(a[d].left, NIL);
        assert_eq!(a[d].right, f);
    }

    #[test]
    fn test_rotations_invert_each_other() {
        let (mut a, d, b, f) = three_nodes();
        rotate_left(&mut a, d);
        rotate_right(&mut a, f);

        assert_eq!(a.root(), d);
        assert_eq!(a[d].left, b);
        assert_eq!(a[d].right, f);
        assert_eq!(a[b].parent, d);
        assert_eq!(a[f].parent, d);
    }

    #[test]
    fn test_rotate_inner_node_keeps_root() {
        // Rotating below the root must not touch the root reference.
        let (mut a, d, _b, f) = three_nodes();
        let g = a.allocate(5).unwrap();
        a[f].left = g;
        a[g].parent = f;

        rotate_right(&mut a, f);
        assert_eq!(a.root(), d);
        assert_eq!(a[d].right, g);
        assert_eq!(a[g].right, f);
        assert_eq!(a[f].parent, g);
    }
}
