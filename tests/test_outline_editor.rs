use tic_r::{descriptor, outline::outline, Outliner};

const CART: &str = "## script: R
draw_player <- function(x, y) {
  spr(1, x, y)
}

`TIC-80` <- function() {
  draw_player(10, 20)
}

update.state <- function(state.prev, dt) state.prev
";

#[test]
fn test_editor_outline_forward_scan() {
    let items = outline(CART).unwrap();
    let names: Vec<&str> = items.iter().map(|it| it.text(CART)).collect();
    // spans follow `function(`, so argument names show up
    assert_eq!(names, vec!["x", "state.prev"]);
}

#[test]
fn test_editor_outline_assigned_names() {
    let mut o = Outliner::new();
    let names: Vec<&str> = o
        .scan_assigned(CART)
        .unwrap()
        .iter()
        .map(|it| it.text(CART))
        .collect();
    assert_eq!(names, vec!["draw_player", "TIC-80", "update.state"]);
}

#[test]
fn test_outline_buffer_is_rescanned() {
    let mut o = Outliner::new();
    let first = CART.to_string();
    let n = o.scan(&first).unwrap().len();
    assert_eq!(n, 2);
    drop(first);

    let second = "f <- function(a) a";
    let items = o.scan(second).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].pos, 14);
    assert!(items.iter().all(|it| it.pos + it.size <= second.len()));
}

#[test]
fn test_descriptor_outline_matches() {
    let d = descriptor();
    assert_eq!((d.outline)(CART).unwrap(), outline(CART).unwrap());
    assert!(CART.bytes().filter(|&c| (d.is_ident_char)(c)).count() > 0);
}

#[test]
fn test_demo_carts_outline() {
    let demo = include_str!("../demos/rdemo.r");
    let mark = include_str!("../demos/rbenchmark.r");
    let mut o = Outliner::new();

    let names: Vec<&str> = o.scan_assigned(demo).unwrap().iter().map(|it| it.text(demo)).collect();
    assert_eq!(names, vec!["TIC-80"]);

    let names: Vec<&str> = o.scan_assigned(mark).unwrap().iter().map(|it| it.text(mark)).collect();
    assert_eq!(names, vec!["new_bunny", "move_bunny", "TIC-80"]);
    assert_eq!(o.scan(mark).unwrap().len(), 1);
}
