use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ptpip_core::{ByteBuffer, OutboundPacket, PacketStream};

fn wire(payload_len: usize) -> Vec<u8> {
    let mut wire = Vec::new();
    for transaction_id in 0..16 {
        for packet in OutboundPacket::data_phase(transaction_id, &vec![0xA5; payload_len]).unwrap() {
            wire.extend_from_slice(&packet.to_bytes());
        }
        wire.extend_from_slice(&OutboundPacket::ping().to_bytes());
    }
    wire
}

fn bench_parse_packets(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_packets");
    for payload_len in [16usize, 512, 8192] {
        let bytes = wire(payload_len);
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(payload_len), &bytes, |b, bytes| {
            b.iter(|| {
                let mut buffer = ByteBuffer::from(bytes.as_slice());
                black_box(buffer.parse_packets())
            })
        });
    }
    group.finish();
}

fn bench_stream_chunks(c: &mut Criterion) {
    let bytes = wire(1024);
    let mut group = c.benchmark_group("packet_stream");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("1460_byte_segments", |b| {
        b.iter(|| {
            let mut stream = PacketStream::new();
            let mut count = 0;
            for segment in bytes.chunks(1460) {
                stream.extend(segment).unwrap();
                count += stream.next_packets().len();
            }
            black_box(count)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_parse_packets, bench_stream_chunks);
criterion_main!(benches);
