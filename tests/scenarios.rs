use outerplanar_mis::{
    ErrorKind, ErrorResponse, Graph, GraphRequest, MisError, MisResponse, MisService, NodeId,
    ServiceConfig, ValidatorKind,
};

fn compute(nodes: Vec<i64>, edges: Vec<(i64, i64)>) -> Result<Vec<i64>, MisError> {
    let service = MisService::default();
    let graph = Graph::new(nodes, edges, service.config().dangling_edges)?;
    let mis = service.compute_graph(&graph)?;
    assert!(graph.is_independent(&mis));
    Ok(mis)
}

#[test]
fn path_of_three() {
    let mut mis = compute(vec![1, 2, 3], vec![(1, 2), (2, 3)]).unwrap();
    mis.sort();
    assert_eq!(mis, vec![1, 3]);
}

#[test]
fn triangle() {
    let mis = compute(vec![1, 2, 3], vec![(1, 2), (2, 3), (1, 3)]).unwrap();
    assert_eq!(mis.len(), 1);
}

#[test]
fn k4_is_rejected() {
    let edges = vec![(1, 2), (1, 3), (1, 4), (2, 3), (2, 4), (3, 4)];
    let err = compute(vec![1, 2, 3, 4], edges).unwrap_err();
    assert!(matches!(err, MisError::NotOuterplanar));
    assert!(err.is_user_error());
}

#[test]
fn empty_graph() {
    assert!(compute(vec![], vec![]).unwrap().is_empty());
}

#[test]
fn single_node() {
    assert_eq!(compute(vec![1], vec![]).unwrap(), vec![1]);
}

#[test]
fn hexagon_takes_alternating_nodes() {
    let edges = (1..=6).map(|i| (i, i % 6 + 1)).collect();
    let mut mis = compute((1..=6).collect(), edges).unwrap();
    assert_eq!(mis.len(), 3);
    mis.sort();
    assert!(mis == vec![1, 3, 5] || mis == vec![2, 4, 6]);
}

#[test]
fn k33_is_rejected_by_planarity() {
    let edges = (1..=3)
        .flat_map(|a| (4..=6).map(move |b| (a, b)))
        .collect();
    let err = compute((1..=6).collect(), edges).unwrap_err();
    assert!(matches!(err, MisError::NotOuterplanar));
}

#[test]
fn json_request_round_trip() {
    let request: GraphRequest<NodeId> = serde_json::from_str(
        r#"{"nodes": ["a", "b", "c", "d"], "edges": [["a", "b"], ["b", "c"], ["c", "d"], ["d", "a"]]}"#,
    )
    .unwrap();
    let resp = MisService::default().compute(&request).unwrap();
    assert_eq!(resp.mis.len(), 2);

    let json = serde_json::to_value(&resp).unwrap();
    assert_eq!(json["mis"].as_array().map(Vec::len), Some(2));
    let back: MisResponse<NodeId> = serde_json::from_value(json).unwrap();
    assert_eq!(back, resp);
}

#[test]
fn rejection_reply_is_classified() {
    let request: GraphRequest<NodeId> =
        serde_json::from_str(r#"{"nodes": [1, 2], "edges": [[1, 3]]}"#).unwrap();
    let err = MisService::default().compute(&request).unwrap_err();
    let reply = ErrorResponse::from(&err);
    assert_eq!(reply.kind, ErrorKind::InvalidGraph);
    let json = serde_json::to_value(&reply).unwrap();
    assert_eq!(json["kind"], "invalid_graph");
}

#[test]
fn wheel_needs_apex_validator() {
    // hub 0 on a 4-cycle rim: K2,3 only as a non-induced subgraph, so the
    // subset search lets it through while the apex test does not
    let mut edges: Vec<(i64, i64)> = (1..=4).map(|i| (i, i % 4 + 1)).collect();
    edges.extend((1..=4).map(|i| (0, i)));
    let request = GraphRequest::new((0..=4).collect(), edges);

    let mis = MisService::default().compute(&request).unwrap().mis;
    assert_eq!(mis.len(), 2);

    let strict = MisService::new(ServiceConfig {
        validator: ValidatorKind::ApexPlanarity,
        ..ServiceConfig::default()
    });
    let err = strict.compute(&request).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotOuterplanar);
}

#[test]
fn tight_time_limit_reports_timeout() {
    let service = MisService::new(ServiceConfig {
        time_limit_ms: Some(0),
        ..ServiceConfig::default()
    });
    let request = GraphRequest::new(vec![1i64, 2], vec![(1, 2)]);
    let err = service.compute(&request).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
}
