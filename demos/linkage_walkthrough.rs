use hcluster::{
    cophenet_correlation, inconsistent, linkage, pdist, to_legacy_linkage, totree, ClusterNode,
    LinkageInput, Method, Metric,
};
use ndarray::array;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Minimal end-to-end: observations -> distances -> linkage -> tree.

    // Two obvious clusters in 2D, plus one straggler.
    let x = array![
        // Cluster A (near (0,0))
        [0.0, 0.0],
        [0.1, 0.0],
        [0.0, 0.1],
        // Cluster B (near (10,10))
        [10.0, 10.0],
        [10.1, 10.0],
        [10.0, 10.1],
        // Straggler
        [5.0, 4.0],
    ];

    let y = pdist(x.view(), &Metric::Euclidean)?;
    println!("pairs={}", y.len());

    for method in Method::ALL {
        let z = linkage(LinkageInput::from(x.view()), method, &Metric::Euclidean)?;
        let top = z.row(z.nrows() - 1);
        print!(
            "{method:>8}: root joins {} + {} at {:.3}",
            top[0], top[1], top[2]
        );
        if let Ok((c, _)) = cophenet_correlation(z.view(), y.view()) {
            print!("  cophenetic r={c:.3}");
        }
        println!();
    }

    let z = linkage(LinkageInput::from(y.view()), Method::Average, &Metric::Euclidean)?;
    println!("\nlinkage (average):\n{z:.3}");

    let root = totree(z.view())?;
    println!("\ntree:");
    print_tree(&root, 0);

    println!("\ninconsistency (depth 2):\n{:.3}", inconsistent(z.view(), 2)?);
    println!("\nlegacy form:\n{:.3}", to_legacy_linkage(z.view())?);

    Ok(())
}

fn print_tree(node: &ClusterNode, indent: usize) {
    println!("{:indent$}{node}", "");
    if let (Some(left), Some(right)) = (node.left(), node.right()) {
        print_tree(left, indent + 2);
        print_tree(right, indent + 2);
    }
}
