#![no_main]

use libfuzzer_sys::fuzz_target;
use qoi_atlas::{DecodeParams, QoiChannels};

fuzz_target!(|data: &[u8]| {
    // first byte picks the output layout, the rest is the image
    let Some((&layout, image)) = data.split_first() else {
        return;
    };
    let channels = if layout & 1 == 0 {
        QoiChannels::Rgb
    } else {
        QoiChannels::Rgba
    };
    let params = DecodeParams::new()
        .set_output_channels(channels)
        .set_flip_x(layout & 2 != 0)
        .set_flip_y(layout & 4 != 0);

    if let Ok(image) = qoi_atlas::decode(image, &params) {
        assert_eq!(image.data.len(), image.header.output_size(channels));
    }
});
