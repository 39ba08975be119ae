#![no_main]

use libfuzzer_sys::fuzz_target;
use resource_metadata::payload::song::register_song;
use resource_metadata::{FrameCodec, MetadataFactory};

fuzz_target!(|data: &[u8]| {
    // Frame decoding must reject or accept, never panic
    let factory = MetadataFactory::new();
    let _ = register_song(&factory);
    let codec = FrameCodec::default();
    let mut buf = data;
    let _ = codec.decode_all(&factory, &mut buf);
});
