//! In-place scaling of every stored tile

use crate::dtype::Element;
use crate::runtime::TiledClient;
use crate::tiled::TiledTensor;

/// `A *= alpha` over the stored tiles only; the tile set never changes.
pub(crate) fn scale<T: Element>(client: &TiledClient, alpha: T, a: &mut TiledTensor<T>) {
    let tiles = a.tiles();
    tracing::debug!(dtype = %T::DTYPE, stored = tiles.len(), "tiled scale");
    client.for_each_item(tiles, |(_, tile)| tile.write().scale(alpha));
}
