pub(crate) mod frame_bridge;
