use actix_web::{HttpResponse, Responder, get, post, web};
use log::info;

use super::models::{AppState, NodesRequest, NodesResponse, PeersResponse, ResolveResponse};

/// List known peers.
#[get("/nodes/")]
pub async fn list_nodes(state: web::Data<AppState>) -> impl Responder {
    let peers = state.peers.read().expect("lock poisoned");
    HttpResponse::Ok().json(PeersResponse {
        total: peers.len(),
        nodes: peers.list(),
    })
}

#[post("/nodes/register/")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<NodesRequest>,
) -> impl Responder {
    if body.nodes.is_empty() {
        return HttpResponse::BadRequest().body("Please supply a valid list of nodes");
    }
    let total = {
        let mut peers = state.peers.write().expect("lock poisoned");
        peers.register_all(body.nodes.as_slice())
    };
    info!("NODES - registered {} address(es), total {total}", body.nodes.len());
    HttpResponse::Created().json(NodesResponse {
        message: "New nodes have been added".to_string(),
        total,
    })
}

#[post("/nodes/deregister/")]
pub async fn deregister_nodes(
    state: web::Data<AppState>,
    body: web::Json<NodesRequest>,
) -> impl Responder {
    let total = {
        let mut peers = state.peers.write().expect("lock poisoned");
        peers.deregister_all(body.nodes.as_slice())
    };
    info!("NODES - deregistered {} address(es), total {total}", body.nodes.len());
    HttpResponse::Ok().json(NodesResponse {
        message: "Nodes have been removed".to_string(),
        total,
    })
}

/// A node announcing itself (see `HttpClient::announce`).
#[post("/nodes/broadcast_ip/")]
pub async fn broadcast_ip(
    state: web::Data<AppState>,
    body: web::Json<Vec<String>>,
) -> impl Responder {
    let total = {
        let mut peers = state.peers.write().expect("lock poisoned");
        peers.register_all(body.as_slice())
    };
    info!("NODES - announced: {:?}, total {total}", body.as_slice());
    HttpResponse::Ok().json(NodesResponse {
        message: "Broadcast received".to_string(),
        total,
    })
}

/// A node leaving the network (see `HttpClient::withdraw`).
#[post("/nodes/broadcast_de_registration/")]
pub async fn broadcast_de_registration(
    state: web::Data<AppState>,
    body: web::Json<Vec<String>>,
) -> impl Responder {
    let total = {
        let mut peers = state.peers.write().expect("lock poisoned");
        peers.deregister_all(body.as_slice())
    };
    info!("NODES - withdrawn: {:?}, total {total}", body.as_slice());
    HttpResponse::Ok().json(NodesResponse {
        message: "De-registration received".to_string(),
        total,
    })
}

/// Run one conflict-resolution pass against all known peers.
#[get("/nodes/resolve/")]
pub async fn resolve_conflicts(state: web::Data<AppState>) -> impl Responder {
    let peers = {
        let registry = state.peers.read().expect("lock poisoned");
        registry.list()
    };
    let replaced = state
        .resolver
        .resolve(&state.ledger, &peers, &state.client)
        .await;

    let chain = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        ledger.chain()
    };
    HttpResponse::Ok().json(ResolveResponse {
        replaced,
        message: if replaced {
            "Our chain was replaced"
        } else {
            "Our chain is authoritative"
        },
        length: chain.len(),
        chain: &chain,
    })
}
