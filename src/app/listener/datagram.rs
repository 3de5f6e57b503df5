use embassy_net::IpEndpoint;
use heapless::Vec;

use super::super::config::DATAGRAM_CAPACITY;

/// One received datagram, copied out of the socket buffer.
#[derive(Debug, PartialEq, Eq)]
pub(super) struct SsdpDatagram {
    pub(super) payload: Vec<u8, DATAGRAM_CAPACITY>,
    pub(super) source: IpEndpoint,
}

impl SsdpDatagram {
    // A reported length beyond the backing slice or the capacity is
    // truncated, never trusted.
    pub(super) fn from_wire(buffer: &[u8], reported_len: usize, source: IpEndpoint) -> Self {
        let take = reported_len.min(buffer.len()).min(DATAGRAM_CAPACITY);
        let mut payload = Vec::new();
        let _ = payload.extend_from_slice(&buffer[..take]);
        Self { payload, source }
    }

    pub(super) fn len(&self) -> usize {
        self.payload.len()
    }

    pub(super) fn as_text(&self) -> Option<&str> {
        core::str::from_utf8(&self.payload).ok()
    }
}

#[cfg(test)]
mod tests {
    use core::net::Ipv4Addr;

    use embassy_net::IpAddress;

    use super::*;

    fn source() -> IpEndpoint {
        IpEndpoint::new(IpAddress::Ipv4(Ipv4Addr::new(10, 0, 0, 5)), 50_000)
    }

    #[test]
    fn exact_reported_length_is_delivered() {
        let mut buffer = [0u8; DATAGRAM_CAPACITY];
        let message = b"M-SEARCH * HTTP/1.1\r\nHOST: 239.255.255.250:1900\r\n";
        buffer[..message.len()].copy_from_slice(message);

        let datagram = SsdpDatagram::from_wire(&buffer, 120, source());
        assert_eq!(datagram.len(), 120);
        assert_eq!(&datagram.payload[..message.len()], message);
        assert_eq!(datagram.source, source());
    }

    #[test]
    fn empty_datagram_is_valid() {
        let buffer = [0u8; DATAGRAM_CAPACITY];
        let datagram = SsdpDatagram::from_wire(&buffer, 0, source());
        assert_eq!(datagram.len(), 0);
    }

    #[test]
    fn oversized_report_truncates_to_capacity() {
        let buffer = [0xABu8; DATAGRAM_CAPACITY];
        let datagram = SsdpDatagram::from_wire(&buffer, 2000, source());
        assert_eq!(datagram.len(), DATAGRAM_CAPACITY);
    }

    #[test]
    fn report_beyond_slice_truncates_to_slice() {
        let buffer = [7u8; 16];
        let datagram = SsdpDatagram::from_wire(&buffer, 64, source());
        assert_eq!(datagram.len(), 16);
    }

    #[test]
    fn text_rendering_requires_utf8() {
        let datagram = SsdpDatagram::from_wire(b"NOTIFY * HTTP/1.1", 17, source());
        assert_eq!(datagram.as_text(), Some("NOTIFY * HTTP/1.1"));

        let datagram = SsdpDatagram::from_wire(&[0xFF, 0xFE], 2, source());
        assert_eq!(datagram.as_text(), None);
    }
}
