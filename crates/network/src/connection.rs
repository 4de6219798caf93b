//! # Game Server Connection
//!
//! A TCP stream split into frames by a 16-bit big-endian length prefix. Each
//! frame carries one message: `{u16 id}{payload}`.
//!
//! ```text
//! {u16 length}{u16 id}{payload ...}{u16 length}{u16 id}{payload ...}
//! ```

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use mana_core::{ManaError, Result};
use mana_protocol::MessageOut;
use std::net::SocketAddr;
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio_util::codec::{Framed, LengthDelimitedCodec};

/// Bytes of the frame length prefix
pub const LENGTH_FIELD_LEN: usize = 2;

/// Codec shared by both ends of a game connection
pub fn frame_codec() -> LengthDelimitedCodec {
    LengthDelimitedCodec::builder()
        .big_endian()
        .length_field_length(LENGTH_FIELD_LEN)
        .max_frame_length(u16::MAX as usize)
        .new_codec()
}

/// Framed connection to the game server
pub struct Connection {
    framed: Framed<TcpStream, LengthDelimitedCodec>,
    peer_addr: SocketAddr,
}

impl Connection {
    /// Connect to a game server
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Self::from_stream(stream)
    }

    /// Wrap an established stream
    pub fn from_stream(stream: TcpStream) -> Result<Self> {
        // Small, latency-sensitive frames
        stream.set_nodelay(true)?;
        let peer_addr = stream.peer_addr()?;
        tracing::debug!("Connected to {}", peer_addr);
        Ok(Self {
            framed: Framed::new(stream, frame_codec()),
            peer_addr,
        })
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Write one message and flush it
    pub async fn send(&mut self, msg: MessageOut) -> Result<()> {
        tracing::trace!("Sending message 0x{:04x} ({} bytes)", msg.id(), msg.payload_len());
        self.framed.send(msg.into_bytes()).await?;
        Ok(())
    }

    /// Next inbound frame, `None` once the server closed the stream
    ///
    /// Cancel safe: a frame is either returned whole or stays buffered.
    pub async fn recv(&mut self) -> Result<Option<Bytes>> {
        match self.framed.next().await {
            Some(Ok(frame)) => Ok(Some(frame.freeze())),
            Some(Err(e)) => Err(ManaError::Network(format!("Read from {} failed: {}", self.peer_addr, e))),
            None => Ok(None),
        }
    }

    /// Flush pending writes and shut the stream down
    pub async fn close(&mut self) -> Result<()> {
        tracing::debug!("Closing connection to {}", self.peer_addr);
        SinkExt::<Bytes>::close(&mut self.framed).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mana_protocol::MessageIn;
    use tokio::net::TcpListener;

    async fn pair() -> (Connection, Framed<TcpStream, LengthDelimitedCodec>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (client, accepted) = tokio::join!(Connection::connect(addr), listener.accept());
        let (server, _) = accepted.unwrap();
        (client.unwrap(), Framed::new(server, frame_codec()))
    }

    #[tokio::test]
    async fn test_frames_carry_length_prefix() {
        let (mut client, server) = pair().await;
        let mut msg = MessageOut::new(0x0260);
        msg.write_i16(100).unwrap();
        msg.write_i16(-5).unwrap();
        client.send(msg).await.unwrap();

        let mut raw = server.into_inner();
        let mut buf = [0u8; 8];
        tokio::io::AsyncReadExt::read_exact(&mut raw, &mut buf).await.unwrap();
        assert_eq!(buf, [0x00, 0x06, 0x02, 0x60, 0x00, 0x64, 0xff, 0xfb]);
    }

    #[tokio::test]
    async fn test_receive_frames_in_order() {
        let (mut client, mut server) = pair().await;
        for id in [0x0151u16, 0x0100] {
            server.send(MessageOut::new(id).into_bytes()).await.unwrap();
        }

        for expected in [0x0151u16, 0x0100] {
            let frame = client.recv().await.unwrap().unwrap();
            assert_eq!(MessageIn::from_frame(frame).unwrap().id(), expected);
        }

        drop(server);
        assert!(client.recv().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_close_flushes_and_ends_stream() {
        let (mut client, mut server) = pair().await;
        client.send(MessageOut::new(0x0152)).await.unwrap();
        client.close().await.unwrap();

        let frame = server.next().await.unwrap().unwrap().freeze();
        assert_eq!(MessageIn::from_frame(frame).unwrap().id(), 0x0152);
        assert!(server.next().await.is_none());
    }
}
