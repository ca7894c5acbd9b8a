use euler_forest::EulerTour;

fn link(t: &mut EulerTour<usize>, u: usize, v: usize) {
    println!("Linking {} and {}", u, v);
    t.link(u, v);
}

fn cut(t: &mut EulerTour<usize>, u: usize, v: usize) {
    println!("Cutting {} and {}", u, v);
    t.cut(u, v);
}

fn connected(t: &EulerTour<usize>, u: usize, v: usize) {
    println!(
        "Are {} and {} connected? {}",
        u,
        v,
        if t.connected(u, v) { "Yes" } else { "No" }
    );
}

fn main() {
    let mut t = EulerTour::new();
    for v in 0..10 {
        t.create_vertex(v);
    }
    for u in 0..9 {
        link(&mut t, u, u + 1);
    }
    println!("Created a path of length 10 (vertices 0 to 9)");
    connected(&t, 0, 9);
    println!("Component of 4 has {} vertices", t.size(4));
    cut(&mut t, 4, 5);
    connected(&t, 0, 9);
    connected(&t, 5, 9);
    println!(
        "Components: {} ({:?} / {:?})",
        t.n_components(),
        t.nodes_in_component(0),
        t.nodes_in_component(9),
    );
    link(&mut t, 2, 7);
    connected(&t, 0, 9);
    println!("Tour from 0: {:?}", t.tour_iter(0).collect::<Vec<_>>());
}
