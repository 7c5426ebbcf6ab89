pub(crate) mod block;
pub(crate) mod minipool;
pub(crate) mod trusted_node;
