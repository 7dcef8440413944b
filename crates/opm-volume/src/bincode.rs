use crate::volume::Volume;

impl<T> bincode::enc::Encode for Volume<T>
where
    T: bincode::enc::Encode,
{
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> Result<(), bincode::error::EncodeError> {
        bincode::Encode::encode(&self.shape, encoder)?;
        bincode::Encode::encode(&self.strides, encoder)?;
        bincode::Encode::encode(&self.as_slice(), encoder)?;
        Ok(())
    }
}

impl<T, C> bincode::de::Decode<C> for Volume<T>
where
    T: bincode::de::Decode<C>,
{
    fn decode<D: bincode::de::Decoder<Context = C>>(
        decoder: &mut D,
    ) -> Result<Self, bincode::error::DecodeError> {
        let shape: [usize; 3] = bincode::Decode::decode(decoder)?;
        let _strides: [usize; 3] = bincode::Decode::decode(decoder)?;
        let data: Vec<T> = bincode::Decode::decode(decoder)?;
        Volume::from_shape_vec(shape, data)
            .map_err(|e| bincode::error::DecodeError::OtherString(format!("Volume error: {}", e)))
    }
}
